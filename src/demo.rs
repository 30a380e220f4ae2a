// src/demo.rs
//
// Synthetic test scene: dark road, red light top-left, red block in the
// lower middle. Useful for trying the pipeline without a camera image.

use crate::types::Frame;
use image::{ImageResult, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;
use std::path::Path;

const WIDTH: u32 = 600;
const HEIGHT: u32 = 400;
const BACKGROUND: Rgb<u8> = Rgb([30, 30, 30]);
const RED: Rgb<u8> = Rgb([255, 0, 0]);

pub fn demo_image() -> RgbImage {
    let mut canvas = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
    // obstacle, corners (250, 250) and (350, 360) inclusive
    draw_filled_rect_mut(&mut canvas, Rect::at(250, 250).of_size(101, 111), RED);
    // red light
    draw_filled_circle_mut(&mut canvas, (100, 80), 20, RED);
    canvas
}

pub fn demo_scene() -> Frame {
    Frame::from_rgb_image(demo_image())
}

pub fn save_demo_scene(path: &Path) -> ImageResult<()> {
    demo_image().save(path)
}
