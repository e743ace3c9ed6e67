// SPDX-License-Identifier: GPL-3.0-only

//! Depth visualization
//!
//! Turns a distance field into an RGBA raster. The default ramp drives only
//! the green channel (depth as a heatmap); grayscale and Turbo ramps are
//! available for displays that prefer them.

use super::frame::DistanceField;
use super::normalize::{NormalizedField, Normalizer, normalize_field};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

/// Mapping from a normalized intensity to a display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorRamp {
    /// Intensity in the green channel, other channels zero
    #[default]
    Green,
    /// Intensity in all three channels
    Grayscale,
    /// Turbo colormap (blue=low, red=high)
    Turbo,
}

impl ColorRamp {
    /// Get all ramp variants for UI iteration
    pub const ALL: [ColorRamp; 3] = [ColorRamp::Green, ColorRamp::Grayscale, ColorRamp::Turbo];

    /// Get display name for the ramp
    pub fn display_name(&self) -> &'static str {
        match self {
            ColorRamp::Green => "Green",
            ColorRamp::Grayscale => "Grayscale",
            ColorRamp::Turbo => "Turbo",
        }
    }

    /// Color for an 8-bit intensity, always fully opaque
    pub fn color(&self, intensity: u8) -> [u8; 4] {
        match self {
            ColorRamp::Green => [0, intensity, 0, 255],
            ColorRamp::Grayscale => [intensity, intensity, intensity, 255],
            ColorRamp::Turbo => {
                let [r, g, b] = turbo(intensity as f32 / 255.0);
                [r, g, b, 255]
            }
        }
    }
}

/// Turbo colormap: perceptually uniform rainbow
///
/// Polynomial approximation of the Google Turbo colormap.
fn turbo(t: f32) -> [u8; 3] {
    let r = (0.13572138
        + t * (4.6153926 + t * (-42.66032 + t * (132.13108 + t * (-152.54825 + t * 59.28144)))))
        .clamp(0.0, 1.0);
    let g = (0.09140261
        + t * (2.19418 + t * (4.84296 + t * (-14.18503 + t * (4.27805 + t * 2.53377)))))
        .clamp(0.0, 1.0);
    let b = (0.1066733
        + t * (12.64194 + t * (-60.58204 + t * (109.99648 + t * (-82.52904 + t * 20.43388)))))
        .clamp(0.0, 1.0);
    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8]
}

/// Display-ready RGBA pixels with the dimensions of the source field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorRaster {
    image: RgbaImage,
}

impl ColorRaster {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// RGBA of the pixel at column `x`, row `y`
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Raw RGBA bytes, row-major, 4 bytes per pixel
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Render already-normalized values with the given ramp
pub fn render_normalized(field: &NormalizedField, ramp: ColorRamp) -> ColorRaster {
    let width = field.width();
    let image = RgbaImage::from_fn(width, field.height(), |x, y| {
        let index = y as usize * width as usize + x as usize;
        Rgba(ramp.color(field.intensity(index)))
    });
    ColorRaster { image }
}

/// Normalize and render a distance field
///
/// Deterministic: the same field, normalizer and ramp always give the same raster.
pub fn render<N: Normalizer + ?Sized>(
    field: &DistanceField,
    normalizer: &N,
    ramp: ColorRamp,
) -> ColorRaster {
    render_normalized(&normalize_field(field, normalizer), ramp)
}
