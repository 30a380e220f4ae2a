// src/vision/contours.rs
//
// Foreground blob extraction: blur, Otsu binarization, outer contours.
// Each surviving blob is classified by area (distance) and shape (type).

use crate::config::VisionConfig;
use crate::types::{BoundingBox, DetectedObject, Distance, Motion, ObjectType};
use image::imageops::replace;
use image::GrayImage;
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::filter::gaussian_blur_f32;
use imageproc::point::Point;
use tracing::debug;

const VEHICLE_ASPECT_RATIO: f64 = 1.2; // wider than tall → vehicle

pub fn detect_objects(gray: &GrayImage, config: &VisionConfig) -> Vec<DetectedObject> {
    if is_flat(gray) {
        debug!("objects: flat frame, no foreground");
        return Vec::new();
    }

    let blurred = if config.blur_sigma > 0.0 {
        gaussian_blur_f32(gray, config.blur_sigma)
    } else {
        gray.clone()
    };
    let binary = binarize_otsu(&blurred);

    let min_area = config.min_contour_area();
    let mut objects = Vec::new();

    for contour in external_contours(&binary) {
        let area = polygon_area(&contour);
        if area < min_area {
            continue;
        }

        let bbox = bounding_box(&contour);
        let distance = classify_distance(area, config);
        let kind = classify_object_type(&bbox, area, config);

        debug!(
            "objects: blob at ({}, {}) {}x{} area={:.0} -> {} {}",
            bbox.x,
            bbox.y,
            bbox.width,
            bbox.height,
            area,
            distance.as_str(),
            kind.as_str()
        );

        objects.push(DetectedObject {
            kind,
            distance,
            motion: Motion::Static,
            area,
            bbox,
        });
    }

    objects
}

/// Otsu threshold, `> level` is foreground.
fn binarize_otsu(gray: &GrayImage) -> GrayImage {
    let level = otsu_level(gray);
    debug!("objects: otsu level {}", level);
    threshold(gray, level, ThresholdType::Binary)
}

/// Outer borders of the top-level blobs, in image coordinates.
///
/// The tracer never starts a border on the first column, so the mask is
/// traced inside a one-pixel background frame and shifted back.
fn external_contours(binary: &GrayImage) -> Vec<Vec<Point<i32>>> {
    let mut padded = GrayImage::new(binary.width() + 2, binary.height() + 2);
    replace(&mut padded, binary, 1, 1);

    find_contours::<i32>(&padded)
        .into_iter()
        .filter(is_external)
        .map(|contour| {
            contour
                .points
                .into_iter()
                .map(|p| Point::new(p.x - 1, p.y - 1))
                .collect()
        })
        .collect()
}

/// True for empty images and images with a single gray level.
fn is_flat(gray: &GrayImage) -> bool {
    let raw = gray.as_raw();
    match (raw.iter().min(), raw.iter().max()) {
        (Some(min), Some(max)) => min == max,
        _ => true,
    }
}

fn is_external(contour: &Contour<i32>) -> bool {
    contour.border_type == BorderType::Outer && contour.parent.is_none()
}

/// Shoelace area of the traced border polygon.
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64)
        .sum();
    twice.abs() as f64 / 2.0
}

pub fn bounding_box(points: &[Point<i32>]) -> BoundingBox {
    let (mut min_x, mut min_y) = (i32::MAX, i32::MAX);
    let (mut max_x, mut max_y) = (i32::MIN, i32::MIN);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    if points.is_empty() {
        return BoundingBox {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
        };
    }
    BoundingBox {
        x: min_x.max(0) as u32,
        y: min_y.max(0) as u32,
        width: (max_x - min_x + 1) as u32,
        height: (max_y - min_y + 1) as u32,
    }
}

pub fn classify_distance(area: f64, config: &VisionConfig) -> Distance {
    if area >= config.near_area {
        Distance::Near
    } else if area >= config.medium_area {
        Distance::Medium
    } else {
        Distance::Far
    }
}

pub fn classify_object_type(bbox: &BoundingBox, area: f64, config: &VisionConfig) -> ObjectType {
    if area < config.pedestrian_area() {
        ObjectType::Pedestrian
    } else if bbox.aspect_ratio() > VEHICLE_ASPECT_RATIO {
        ObjectType::Vehicle
    } else {
        ObjectType::Obstacle
    }
}
