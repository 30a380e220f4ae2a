// src/config.rs

use crate::types::Action;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// DEFAULT THRESHOLDS
// ============================================================================
const VISIBILITY_BRIGHTNESS_THRESHOLD: f64 = 50.0; // mean gray level, 0-255
const TRAFFIC_RED_THRESHOLD: f64 = 1.5; // red/green score ratio
const TRAFFIC_GREEN_THRESHOLD: f64 = 1.5; // green/red score ratio
const CONTOUR_AREA_NEAR: f64 = 4000.0; // px²
const CONTOUR_AREA_MEDIUM: f64 = 1500.0; // px²
const BLUR_SIGMA: f32 = 1.1; // sigma of a 5x5 Gaussian kernel

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub vision: VisionConfig,
    pub decision: DecisionConfig,
    pub logging: LoggingConfig,
}

/// Inclusive HSV range on the OpenCV scale (H 0-180, S 0-255, V 0-255).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvBand {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvBand {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    #[inline]
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| hsv[c] >= self.lower[c] && hsv[c] <= self.upper[c])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    pub brightness_threshold: f64,
    pub red_ratio_threshold: f64,
    pub green_ratio_threshold: f64,
    pub near_area: f64,
    pub medium_area: f64,
    pub blur_sigma: f32,
    /// Red wraps around hue 0, so it takes two bands.
    pub red_bands: [HsvBand; 2],
    pub green_band: HsvBand,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            brightness_threshold: VISIBILITY_BRIGHTNESS_THRESHOLD,
            red_ratio_threshold: TRAFFIC_RED_THRESHOLD,
            green_ratio_threshold: TRAFFIC_GREEN_THRESHOLD,
            near_area: CONTOUR_AREA_NEAR,
            medium_area: CONTOUR_AREA_MEDIUM,
            blur_sigma: BLUR_SIGMA,
            red_bands: [
                HsvBand::new([0, 70, 50], [10, 255, 255]),
                HsvBand::new([170, 70, 50], [180, 255, 255]),
            ],
            green_band: HsvBand::new([40, 40, 40], [90, 255, 255]),
        }
    }
}

impl VisionConfig {
    /// Contours smaller than this are noise.
    pub fn min_contour_area(&self) -> f64 {
        self.medium_area * 0.5
    }

    /// Below this a blob is too small to be anything but a pedestrian.
    pub fn pedestrian_area(&self) -> f64 {
        self.medium_area * 0.8
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    pub default_action_on_error: Action,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            default_action_on_error: Action::SlowDown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str("vision:\n  near_area: 9000.0\n").unwrap();
        assert_eq!(config.vision.near_area, 9000.0);
        assert_eq!(config.vision.medium_area, CONTOUR_AREA_MEDIUM);
        assert_eq!(config.decision.default_action_on_error, Action::SlowDown);
    }

    #[test]
    fn test_load_shipped_config_matches_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.yaml");
        let config = Config::load(path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(Config::load("/definitely/not/here.yaml").is_err());
    }

    #[test]
    fn test_load_from_path_buf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thresholds.yaml");
        fs::write(&path, "decision:\n  default_action_on_error: STOP\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.decision.default_action_on_error, Action::Stop);
        assert_eq!(config.vision, VisionConfig::default());
    }

    #[cfg(unix)]
    #[test]
    fn test_load_from_non_utf8_path() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OsStr::from_bytes(b"night\xffrun.yaml"));
        fs::write(&path, "vision:\n  near_area: 5000.0\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.vision.near_area, 5000.0);
    }

    #[test]
    fn test_hsv_band_inclusive() {
        let band = HsvBand::new([40, 40, 40], [90, 255, 255]);
        assert!(band.contains([40, 40, 40]));
        assert!(band.contains([90, 255, 255]));
        assert!(!band.contains([39, 200, 200]));
        assert!(!band.contains([60, 39, 200]));
    }

    #[test]
    fn test_derived_areas() {
        let v = VisionConfig::default();
        assert_eq!(v.min_contour_area(), 750.0);
        assert_eq!(v.pedestrian_area(), 1200.0);
    }
}
