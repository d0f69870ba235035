use std::io::Cursor;

use ab_glyph::{FontArc, PxScale};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_text_mut, text_size};
use thiserror::Error;

use crate::utils::assets::{AssetError, AssetStore};

pub const DEFAULT_SIZE: (u32, u32) = (800, 600);

const MARGIN: f32 = 50.0;
const TITLE_BAND: f32 = 40.0;
const POINT_RADIUS: i32 = 4;
const AXIS_WIDTH: i32 = 2;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Chart has no data points")]
    EmptySeries,
    #[error("Chart series lengths differ: {x} x values, {y} y values")]
    LengthMismatch { x: usize, y: usize },
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("Failed to encode chart PNG: {0}")]
    Encode(#[from] image::ImageError),
}

/// A scatter series with its labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartData {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub x_legends: Vec<String>,
    pub y_legends: Vec<String>,
    pub x_label: String,
    pub y_label: String,
    pub title: String,
    /// Subtitle drawn under the title.
    pub description: String,
    pub width: u32,
    pub height: u32,
}

impl ChartData {
    /// Fixed data set drawn by `/charttest`.
    pub fn sample() -> Self {
        ChartData {
            x: vec![1.0, 2.0, 3.0, 4.0, 5.0],
            y: vec![10.0, 20.0, 15.0, 25.0, 30.0],
            x_legends: ["A", "B", "C", "D", "E"].map(String::from).to_vec(),
            y_legends: ["Low", "Medium", "High", "Very High"]
                .map(String::from)
                .to_vec(),
            x_label: "Categories".to_string(),
            y_label: "Values".to_string(),
            title: "Test Chart".to_string(),
            description: "This is a test chart".to_string(),
            width: DEFAULT_SIZE.0,
            height: DEFAULT_SIZE.1,
        }
    }

    /// Canvas size; zero dimensions fall back to [`DEFAULT_SIZE`].
    pub fn size(&self) -> (u32, u32) {
        if self.width == 0 || self.height == 0 {
            DEFAULT_SIZE
        } else {
            (self.width, self.height)
        }
    }

    pub fn validate(&self) -> Result<(), ChartError> {
        if self.x.len() != self.y.len() {
            return Err(ChartError::LengthMismatch {
                x: self.x.len(),
                y: self.y.len(),
            });
        }
        if self.x.is_empty() {
            return Err(ChartError::EmptySeries);
        }
        Ok(())
    }
}

/// Min and max of `values` by linear scan.
pub fn bounds(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| {
            (min.min(v), max.max(v))
        })
}

/// Position of `v` within `[min, max]`; a flat axis puts everything in the middle.
pub fn normalize(v: f64, min: f64, max: f64) -> f64 {
    if max == min { 0.5 } else { (v - min) / (max - min) }
}

/// The area points are plotted in, below the title band.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlotRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl PlotRect {
    pub fn for_canvas(width: u32, height: u32) -> Self {
        PlotRect {
            left: MARGIN,
            top: MARGIN + TITLE_BAND,
            right: width as f32 - MARGIN,
            bottom: height as f32 - MARGIN,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Canvas position for normalised coordinates; y grows upwards.
    pub fn project(&self, x_norm: f64, y_norm: f64) -> (f32, f32) {
        (
            self.left + x_norm as f32 * self.width(),
            self.bottom - y_norm as f32 * self.height(),
        )
    }
}

/// Canvas positions of every sample, in input order.
pub fn plot_points(data: &ChartData, plot: &PlotRect) -> Result<Vec<(f32, f32)>, ChartError> {
    data.validate()?;
    let (x_min, x_max) = bounds(&data.x);
    let (y_min, y_max) = bounds(&data.y);

    Ok(data
        .x
        .iter()
        .zip(&data.y)
        .map(|(&x, &y)| {
            plot.project(
                normalize(x, x_min, x_max),
                normalize(y, y_min, y_max),
            )
        })
        .collect())
}

fn draw_centered(img: &mut RgbaImage, x: f32, y: f32, size: f32, font: &FontArc, text: &str) {
    if text.is_empty() {
        return;
    }
    let scale = PxScale::from(size);
    let (w, h) = text_size(scale, font, text);
    let left = (x - w as f32 / 2.0).round() as i32;
    let top = (y - h as f32 / 2.0).round() as i32;
    draw_text_mut(img, INK, left, top, scale, font, text);
}

fn draw_thick_line(img: &mut RgbaImage, start: (f32, f32), end: (f32, f32)) {
    let horizontal = start.1 == end.1;
    for offset in 0..AXIS_WIDTH {
        let shift = offset as f32 - (AXIS_WIDTH - 1) as f32 / 2.0;
        let (a, b) = if horizontal {
            ((start.0, start.1 + shift), (end.0, end.1 + shift))
        } else {
            ((start.0 + shift, start.1), (end.0 + shift, end.1))
        };
        draw_line_segment_mut(img, a, b, INK);
    }
}

/// Draws `data` as a scatter chart and returns PNG bytes.
pub fn render_chart(data: &ChartData, font: &FontArc) -> Result<Vec<u8>, ChartError> {
    let (width, height) = data.size();
    let plot = PlotRect::for_canvas(width, height);
    let points = plot_points(data, &plot)?;

    tracing::debug!(
        "[CHART] Rendering '{}' with {} points on {}x{}",
        data.title,
        points.len(),
        width,
        height
    );

    let mut img = RgbaImage::from_pixel(width, height, BACKGROUND);
    let (w, h) = (width as f32, height as f32);

    draw_centered(&mut img, w / 2.0, 30.0, 24.0, font, &data.title);
    draw_centered(&mut img, w / 2.0, 58.0, 14.0, font, &data.description);

    draw_thick_line(&mut img, (MARGIN, h - MARGIN), (MARGIN, MARGIN));
    draw_thick_line(&mut img, (MARGIN, h - MARGIN), (w - MARGIN, h - MARGIN));

    draw_centered(&mut img, w / 2.0, h - 20.0, 14.0, font, &data.x_label);
    draw_centered(&mut img, 20.0, h / 2.0, 14.0, font, &data.y_label);

    for (index, &(x, y)) in points.iter().enumerate() {
        draw_filled_circle_mut(&mut img, (x.round() as i32, y.round() as i32), POINT_RADIUS, INK);
        if let Some(legend) = data.x_legends.get(index) {
            draw_centered(&mut img, x, plot.bottom + 12.0, 12.0, font, legend);
        }
    }

    let steps = data.y_legends.len();
    for (index, legend) in data.y_legends.iter().enumerate() {
        let fraction = if steps > 1 {
            index as f64 / (steps - 1) as f64
        } else {
            0.5
        };
        let (_, y) = plot.project(0.0, fraction);
        draw_centered(&mut img, MARGIN / 2.0 + 8.0, y, 12.0, font, legend);
    }

    let mut out_buf: Vec<u8> = Vec::new();
    DynamicImage::ImageRgba8(img).write_to(&mut Cursor::new(&mut out_buf), image::ImageFormat::Png)?;

    tracing::info!("[CHART] Successfully generated chart ({} bytes)", out_buf.len());
    Ok(out_buf)
}

/// Loads the chart font from `assets` and renders `data`.
pub fn render_chart_with_assets(data: &ChartData, assets: &AssetStore) -> Result<Vec<u8>, ChartError> {
    let font = assets.font("comfortaa.ttf")?;
    render_chart(data, &font)
}
