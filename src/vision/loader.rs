// src/vision/loader.rs

use crate::error::VisionError;
use crate::types::Frame;
use std::path::Path;
use tracing::debug;

/// Turns a path into a decoded frame. The pipeline only ever sees this seam,
/// so tests and embedders can swap in their own decoding.
pub trait ImageLoader {
    fn load(&self, path: &Path) -> Result<Frame, VisionError>;
}

/// Decodes any format the `image` crate understands into RGB8.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileImageLoader;

impl ImageLoader for FileImageLoader {
    fn load(&self, path: &Path) -> Result<Frame, VisionError> {
        let image = image::open(path).map_err(|source| VisionError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let rgb = image.to_rgb8();
        debug!(
            "loaded {} ({}x{})",
            path.display(),
            rgb.width(),
            rgb.height()
        );
        Ok(Frame::from_rgb_image(rgb))
    }
}
