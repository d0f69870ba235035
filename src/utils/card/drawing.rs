use std::f32::consts::TAU;

use ab_glyph::{FontArc, PxScale};
use image::imageops;
use image::{Pixel, Rgba, RgbaImage};
use imageproc::drawing::{Blend, draw_filled_rect_mut, draw_text_mut, text_size};

use super::layout::Rect;

/// Alpha-blends `colour` over the pixel at (x, y); out-of-bounds coordinates are ignored.
pub fn blend_pixel(img: &mut RgbaImage, x: i32, y: i32, colour: Rgba<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.get_pixel_mut(x as u32, y as u32).blend(&colour);
    }
}

/// Alpha-blends `colour` over `rect`, clipped to the image.
pub fn fill_rect(img: &mut RgbaImage, rect: Rect, colour: Rgba<u8>) {
    if rect.width == 0 || rect.height == 0 {
        return;
    }
    let mut canvas = Blend(std::mem::take(img));
    draw_filled_rect_mut(
        &mut canvas,
        imageproc::rect::Rect::at(rect.x, rect.y).of_size(rect.width, rect.height),
        colour,
    );
    *img = canvas.0;
}

/// Fills `rect` with quarter-circle corners of `radius`.
pub fn fill_rounded_rect(img: &mut RgbaImage, rect: Rect, radius: f32, colour: Rgba<u8>) {
    let radius = radius
        .min(rect.width as f32 / 2.0)
        .min(rect.height as f32 / 2.0)
        .max(0.0);
    let (left, top) = (rect.x as f32, rect.y as f32);
    let (right, bottom) = (rect.right() as f32, rect.bottom() as f32);

    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;
            let cx = px.clamp(left + radius, right - radius);
            let cy = py.clamp(top + radius, bottom - radius);
            let (dx, dy) = (px - cx, py - cy);
            if dx * dx + dy * dy <= radius * radius {
                blend_pixel(img, x, y, colour);
            }
        }
    }
}

/// Draws `text` so that the point (`x`, `y`) sits at fraction (`ax`, `ay`) of its bounding box.
#[allow(clippy::too_many_arguments)]
pub fn draw_text_anchored(
    img: &mut RgbaImage,
    colour: Rgba<u8>,
    x: f32,
    y: f32,
    ax: f32,
    ay: f32,
    size: f32,
    font: &FontArc,
    text: &str,
) {
    if text.is_empty() {
        return;
    }
    let scale = PxScale::from(size);
    let (w, h) = text_size(scale, font, text);
    let left = (x - ax * w as f32).round() as i32;
    let top = (y - ay * h as f32).round() as i32;
    draw_text_mut(img, colour, left, top, scale, font, text);
}

/// Alpha-composites `top` so that its centre lands on (`cx`, `cy`).
pub fn overlay_centered(img: &mut RgbaImage, top: &RgbaImage, cx: f32, cy: f32) {
    let x = (cx - top.width() as f32 / 2.0).round() as i64;
    let y = (cy - top.height() as f32 / 2.0).round() as i64;
    imageops::overlay(img, top, x, y);
}

/// Fills the ring segment between `inner` and `outer` radius from angle `start` to `end` (radians,
/// clockwise on screen). Returns the number of pixels touched.
#[allow(clippy::too_many_arguments)]
pub fn fill_annular_sector(
    img: &mut RgbaImage,
    center: (f32, f32),
    outer: f32,
    inner: f32,
    start: f32,
    end: f32,
    colour: Rgba<u8>,
) -> usize {
    let span = end - start;
    if span <= 0.0 || outer <= inner {
        return 0;
    }
    let full_turn = span >= TAU - 1e-6;

    let (cx, cy) = center;
    let min_x = (cx - outer).floor() as i32;
    let max_x = (cx + outer).ceil() as i32;
    let min_y = (cy - outer).floor() as i32;
    let max_y = (cy + outer).ceil() as i32;

    let mut touched = 0;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let r = (dx * dx + dy * dy).sqrt();
            if r < inner || r > outer {
                continue;
            }
            if !full_turn && (dy.atan2(dx) - start).rem_euclid(TAU) >= span {
                continue;
            }
            blend_pixel(img, x, y, colour);
            touched += 1;
        }
    }
    touched
}
