// SPDX-License-Identifier: GPL-3.0-only

//! Raster-to-surface placement
//!
//! The depth sensor is usually mounted rotated relative to the display, so the
//! raster is center-fit into the surface and then turned about the surface
//! center by the mounting angle.

use serde::{Deserialize, Serialize};

/// Sensor rotation in degrees (clockwise)
///
/// Depth modules on handsets are commonly mounted at 90° or 270° relative
/// to the display orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SensorRotation {
    /// No rotation (sensor is oriented correctly)
    None,
    /// 90 degrees clockwise
    #[default]
    Rotate90,
    /// 180 degrees (upside down)
    Rotate180,
    /// 270 degrees clockwise (90 degrees counter-clockwise)
    Rotate270,
}

impl SensorRotation {
    /// Create rotation from an integer degree value (normalised to 0-360).
    pub fn from_degrees_int(degrees: i32) -> Self {
        match degrees.rem_euclid(360) {
            90 => SensorRotation::Rotate90,
            180 => SensorRotation::Rotate180,
            270 => SensorRotation::Rotate270,
            _ => SensorRotation::None,
        }
    }

    /// Get the rotation in degrees
    pub fn degrees(&self) -> u32 {
        match self {
            SensorRotation::None => 0,
            SensorRotation::Rotate90 => 90,
            SensorRotation::Rotate180 => 180,
            SensorRotation::Rotate270 => 270,
        }
    }

    /// Check if rotation swaps width and height
    pub fn swaps_dimensions(&self) -> bool {
        matches!(self, SensorRotation::Rotate90 | SensorRotation::Rotate270)
    }
}

impl std::fmt::Display for SensorRotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// 2D affine map from raster coordinates to surface coordinates
///
/// ```text
/// | scale_x  skew_x   translate_x |
/// | skew_y   scale_y  translate_y |
/// ```
///
/// `#[repr(C)]` and `Pod` so it can be uploaded as a uniform as-is.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DisplayTransform {
    pub scale_x: f32,
    pub skew_x: f32,
    pub translate_x: f32,
    pub skew_y: f32,
    pub scale_y: f32,
    pub translate_y: f32,
}

impl DisplayTransform {
    pub const IDENTITY: Self = Self {
        scale_x: 1.0,
        skew_x: 0.0,
        translate_x: 0.0,
        skew_y: 0.0,
        scale_y: 1.0,
        translate_y: 0.0,
    };

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            scale_x: sx,
            scale_y: sy,
            ..Self::IDENTITY
        }
    }

    pub fn translate(dx: f32, dy: f32) -> Self {
        Self {
            translate_x: dx,
            translate_y: dy,
            ..Self::IDENTITY
        }
    }

    /// Clockwise rotation (y axis pointing down) about `(px, py)`
    pub fn rotate_about(degrees: f32, px: f32, py: f32) -> Self {
        let (sin, cos) = sin_cos_degrees(degrees);
        // T(p) * R * T(-p)
        Self {
            scale_x: cos,
            skew_x: -sin,
            translate_x: px - cos * px + sin * py,
            skew_y: sin,
            scale_y: cos,
            translate_y: py - sin * px - cos * py,
        }
    }

    /// Apply `self` first, then `next`
    pub fn then(&self, next: &DisplayTransform) -> DisplayTransform {
        let a = next;
        let b = self;
        DisplayTransform {
            scale_x: a.scale_x * b.scale_x + a.skew_x * b.skew_y,
            skew_x: a.scale_x * b.skew_x + a.skew_x * b.scale_y,
            translate_x: a.scale_x * b.translate_x + a.skew_x * b.translate_y + a.translate_x,
            skew_y: a.skew_y * b.scale_x + a.scale_y * b.skew_y,
            scale_y: a.skew_y * b.skew_x + a.scale_y * b.scale_y,
            translate_y: a.skew_y * b.translate_x + a.scale_y * b.translate_y + a.translate_y,
        }
    }

    pub fn map_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.scale_x * x + self.skew_x * y + self.translate_x,
            self.skew_y * x + self.scale_y * y + self.translate_y,
        )
    }

    /// Surface-to-raster map, or None when the transform collapses an axis
    pub fn invert(&self) -> Option<DisplayTransform> {
        let det = self.scale_x * self.scale_y - self.skew_x * self.skew_y;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let scale_x = self.scale_y / det;
        let skew_x = -self.skew_x / det;
        let skew_y = -self.skew_y / det;
        let scale_y = self.scale_x / det;
        Some(DisplayTransform {
            scale_x,
            skew_x,
            translate_x: -(scale_x * self.translate_x + skew_x * self.translate_y),
            skew_y,
            scale_y,
            translate_y: -(skew_y * self.translate_x + scale_y * self.translate_y),
        })
    }

    /// Row-major 3x3 homogeneous matrix
    pub fn to_mat3(&self) -> [[f32; 3]; 3] {
        [
            [self.scale_x, self.skew_x, self.translate_x],
            [self.skew_y, self.scale_y, self.translate_y],
            [0.0, 0.0, 1.0],
        ]
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl Default for DisplayTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Exact values for right angles so 90°/270° do not leave 1e-8 skews behind
fn sin_cos_degrees(degrees: f32) -> (f32, f32) {
    let normalized = degrees.rem_euclid(360.0);
    if normalized == 0.0 {
        (0.0, 1.0)
    } else if normalized == 90.0 {
        (1.0, 0.0)
    } else if normalized == 180.0 {
        (0.0, -1.0)
    } else if normalized == 270.0 {
        (-1.0, 0.0)
    } else {
        normalized.to_radians().sin_cos()
    }
}

/// Center-fit a raster into a surface, then rotate about the surface center
///
/// Aspect ratio is preserved. Zero-sized inputs yield the identity; callers
/// should not draw in that case.
pub fn compute_transform(
    raster_width: u32,
    raster_height: u32,
    surface_width: u32,
    surface_height: u32,
    rotation_degrees: f32,
) -> DisplayTransform {
    if raster_width == 0 || raster_height == 0 || surface_width == 0 || surface_height == 0 {
        return DisplayTransform::IDENTITY;
    }

    let (rw, rh) = (raster_width as f32, raster_height as f32);
    let (sw, sh) = (surface_width as f32, surface_height as f32);

    let scale = (sw / rw).min(sh / rh);
    let dx = (sw - rw * scale) / 2.0;
    let dy = (sh - rh * scale) / 2.0;

    DisplayTransform::scale(scale, scale)
        .then(&DisplayTransform::translate(dx, dy))
        .then(&DisplayTransform::rotate_about(
            rotation_degrees,
            sw / 2.0,
            sh / 2.0,
        ))
}
