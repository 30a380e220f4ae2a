// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Perception failures. These never escape the pipeline orchestrator; they
/// are turned into the fallback result there.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("could not read image at {}: {source}", .path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid frame: {0}")]
    InvalidFrame(String),
}
