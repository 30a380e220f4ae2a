// src/vision/mod.rs
//
// Single-frame scene extraction. Everything is derived from one image, so
// motion is always reported as static: there is no previous frame to
// compare against.

pub mod color;
pub mod contours;
pub mod loader;

pub use loader::{FileImageLoader, ImageLoader};

use crate::config::VisionConfig;
use crate::error::VisionError;
use crate::types::{DetectedObject, Environment, Frame, RawScene, TrafficLight};
use std::path::Path;
use tracing::debug;

/// More objects than this on screen reads as an urban scene.
const URBAN_OBJECT_COUNT: usize = 2;

#[derive(Debug, Clone, Default)]
pub struct VisionAnalyzer {
    config: VisionConfig,
}

impl VisionAnalyzer {
    pub fn new(config: VisionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VisionConfig {
        &self.config
    }

    pub fn analyze_path(
        &self,
        loader: &impl ImageLoader,
        path: &Path,
    ) -> Result<RawScene, VisionError> {
        let frame = loader.load(path)?;
        self.analyze_frame(&frame)
    }

    pub fn analyze_frame(&self, frame: &Frame) -> Result<RawScene, VisionError> {
        validate_frame(frame)?;

        let gray = color::to_grayscale(frame);
        let visibility = color::infer_visibility(&gray, &self.config);
        let traffic_light = color::detect_traffic_light(frame, &self.config);
        let objects = contours::detect_objects(&gray, &self.config);
        let environment = infer_environment(&objects, traffic_light);

        debug!(
            "vision: {} object(s), light={:?}, visibility={:?}, environment={:?}",
            objects.len(),
            traffic_light,
            visibility,
            environment
        );

        Ok(RawScene {
            objects,
            traffic_light,
            visibility,
            environment,
        })
    }
}

/// A frame must be a non-empty 3-channel grid whose buffer matches its size.
pub fn validate_frame(frame: &Frame) -> Result<(), VisionError> {
    if frame.channels != 3 {
        return Err(VisionError::InvalidFrame(format!(
            "expected 3 channels, got {}",
            frame.channels
        )));
    }
    if frame.width == 0 || frame.height == 0 {
        return Err(VisionError::InvalidFrame(format!(
            "empty frame {}x{}",
            frame.width, frame.height
        )));
    }
    let expected = frame
        .width
        .checked_mul(frame.height)
        .and_then(|n| n.checked_mul(3))
        .ok_or_else(|| {
            VisionError::InvalidFrame(format!(
                "frame {}x{} is too large",
                frame.width, frame.height
            ))
        })?;
    if frame.data.len() != expected {
        return Err(VisionError::InvalidFrame(format!(
            "buffer has {} bytes, {}x{}x3 needs {}",
            frame.data.len(),
            frame.width,
            frame.height,
            expected
        )));
    }
    Ok(())
}

/// `Indoor` is part of the vocabulary but is never inferred from pixels.
pub fn infer_environment(objects: &[DetectedObject], traffic_light: TrafficLight) -> Environment {
    if traffic_light != TrafficLight::Unknown || objects.len() > URBAN_OBJECT_COUNT {
        Environment::Urban
    } else {
        Environment::OpenArea
    }
}
