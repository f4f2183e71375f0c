//! Compositing and PNG export
//!
//! Blends the RGBA tissue overlay onto the grayscale anatomical slice
//! and writes the result as a square PNG. The canvas side length is
//! `size_in * dpi` pixels, so the default 1 inch at 300 dpi gives a
//! 300x300 output with no axes or borders.

use std::path::PathBuf;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::overlay::Overlay;
use crate::slice::Slice;

/// Output figure geometry and destination.
#[derive(Debug, Clone)]
pub struct RenderParams {
    /// Figure side length in inches
    pub size_in: f64,
    /// Dots per inch of the exported raster
    pub dpi: u32,
    /// Output file path (overwritten if present)
    pub output: PathBuf,
}

impl Default for RenderParams {
    fn default() -> Self {
        RenderParams {
            size_in: 1.0,
            dpi: 300,
            output: PathBuf::from("overlay.png"),
        }
    }
}

fn to_u8(channel: f64) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Composite the overlay onto the grayscale base and export a PNG
///
/// The base slice is normalized to [0, 1] by its own min/max (a
/// grayscale colormap), the overlay is alpha-blended on top per pixel,
/// and the blended raster is resampled to the canvas size with
/// bilinear filtering before writing. Any existing file at the output
/// path is overwritten.
///
/// # Arguments
/// * `base` - Grayscale anatomical slice
/// * `overlay` - RGBA overlay of identical pixel shape
/// * `params` - Canvas geometry and output path
pub fn render_overlay(base: &Slice, overlay: &Overlay, params: &RenderParams) -> Result<(), String> {
    if overlay.rows != base.rows || overlay.cols != base.cols {
        return Err(format!(
            "Shape mismatch: overlay is {}x{}, base slice is {}x{}",
            overlay.rows, overlay.cols, base.rows, base.cols
        ));
    }

    let min = base.data.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = base.data.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    let mut img = RgbaImage::new(base.cols as u32, base.rows as u32);
    for r in 0..base.rows {
        for c in 0..base.cols {
            let gray = if range > 0.0 { (base.get(r, c) - min) / range } else { 0.0 };
            let [cr, cg, cb, a] = overlay.pixel(r, c);
            let red = cr * a + gray * (1.0 - a);
            let green = cg * a + gray * (1.0 - a);
            let blue = cb * a + gray * (1.0 - a);
            img.put_pixel(
                c as u32,
                r as u32,
                Rgba([to_u8(red), to_u8(green), to_u8(blue), 255]),
            );
        }
    }

    let canvas = (params.size_in * params.dpi as f64).round() as u32;
    let resized = imageops::resize(&img, canvas, canvas, FilterType::Triangle);
    resized
        .save(&params.output)
        .map_err(|e| format!("Failed to write '{}': {}", params.output.display(), e))
}
