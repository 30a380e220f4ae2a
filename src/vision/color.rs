// src/vision/color.rs
//
// Pixel-level color cues: luma for visibility, HSV masks for the traffic
// light. Everything here reads the frame directly; no intermediate images
// are allocated except the grayscale one the contour stage reuses.

use crate::config::VisionConfig;
use crate::types::{Frame, TrafficLight, Visibility};
use image::{GrayImage, Luma};
use tracing::debug;

// ============================================================================
// HSV CONVERSION
// ============================================================================

/// HSV on the 8-bit OpenCV scale (H 0-180, S 0-255, V 0-255), which is the
/// scale the configured bands are written in.
#[inline]
pub fn rgb_to_hsv8(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(u32::from);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    // round(255 * delta / max), half up
    let s = if max == 0 {
        0
    } else {
        (510 * delta + max) / (2 * max)
    };

    let h = if delta == 0 {
        0.0
    } else {
        let d = delta as f32;
        let deg = if max == r {
            60.0 * (g as f32 - b as f32) / d
        } else if max == g {
            120.0 + 60.0 * (b as f32 - r as f32) / d
        } else {
            240.0 + 60.0 * (r as f32 - g as f32) / d
        };
        if deg < 0.0 {
            deg + 360.0
        } else {
            deg
        }
    };

    [(h / 2.0).round().min(180.0) as u8, s as u8, max as u8]
}

// ============================================================================
// VISIBILITY
// ============================================================================

/// BT.601 luma, same weights OpenCV uses for BGR2GRAY.
#[inline]
pub fn luma(rgb: [u8; 3]) -> u8 {
    let y = 0.299 * rgb[0] as f32 + 0.587 * rgb[1] as f32 + 0.114 * rgb[2] as f32;
    y.round().min(255.0) as u8
}

pub fn to_grayscale(frame: &Frame) -> GrayImage {
    GrayImage::from_fn(frame.width as u32, frame.height as u32, |x, y| {
        Luma([luma(frame.pixel(x as usize, y as usize))])
    })
}

pub fn mean_brightness(gray: &GrayImage) -> f64 {
    let count = gray.as_raw().len();
    if count == 0 {
        return 0.0;
    }
    let sum: u64 = gray.as_raw().iter().map(|&p| p as u64).sum();
    sum as f64 / count as f64
}

pub fn infer_visibility(gray: &GrayImage, config: &VisionConfig) -> Visibility {
    let brightness = mean_brightness(gray);
    let visibility = if brightness < config.brightness_threshold {
        Visibility::Low
    } else {
        Visibility::Clear
    };
    debug!(
        "visibility: mean brightness {:.1} (threshold {:.1}) -> {:?}",
        brightness, config.brightness_threshold, visibility
    );
    visibility
}

// ============================================================================
// TRAFFIC LIGHT
// ============================================================================

/// Mask pixel counts, each offset by one so the ratios are always defined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScores {
    pub red: f64,
    pub green: f64,
}

pub fn score_traffic_colors(frame: &Frame, config: &VisionConfig) -> ColorScores {
    let mut red: u64 = 0;
    let mut green: u64 = 0;

    for px in frame.data.chunks_exact(3) {
        let hsv = rgb_to_hsv8([px[0], px[1], px[2]]);
        if config.red_bands.iter().any(|band| band.contains(hsv)) {
            red += 1;
        }
        if config.green_band.contains(hsv) {
            green += 1;
        }
    }

    ColorScores {
        red: (red + 1) as f64,
        green: (green + 1) as f64,
    }
}

/// Red is checked first: when both cues are strong we would rather stop.
pub fn classify_traffic_light(scores: ColorScores, config: &VisionConfig) -> TrafficLight {
    if scores.red / scores.green > config.red_ratio_threshold {
        TrafficLight::Red
    } else if scores.green / scores.red > config.green_ratio_threshold {
        TrafficLight::Green
    } else {
        TrafficLight::Unknown
    }
}

pub fn detect_traffic_light(frame: &Frame, config: &VisionConfig) -> TrafficLight {
    let scores = score_traffic_colors(frame, config);
    let light = classify_traffic_light(scores, config);
    debug!(
        "traffic light: red={} green={} -> {:?}",
        scores.red, scores.green, light
    );
    light
}
