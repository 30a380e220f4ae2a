// src/lib.rs
//
// Single image in, safety decision out:
// vision → normalize → risk → decision → explanation.

pub mod config;
pub mod decision;
pub mod demo;
pub mod error;
pub mod explanation;
pub mod pipeline;
pub mod risk;
pub mod scene;
pub mod types;
pub mod vision;


pub use config::Config;
pub use error::VisionError;
pub use pipeline::{ImageSource, PipelineOrchestrator, PipelineRun};
pub use types::{Action, Frame, PipelineResult, RiskAssessment, RiskLevel, Scene, SceneFacts};
