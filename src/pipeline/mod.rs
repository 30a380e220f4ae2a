// src/pipeline/mod.rs

pub mod orchestrator;
pub mod stage;

pub use orchestrator::{
    fallback_result, ImageSource, PipelineOrchestrator, PipelineRun, FALLBACK_EXPLANATION,
    FALLBACK_FACTOR,
};
pub use stage::{PipelineStage, StageTrace};
