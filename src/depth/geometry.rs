// SPDX-License-Identifier: GPL-3.0-only

//! Scalar measurements from a distance field
//!
//! The field-of-view estimate treats the leftmost and rightmost samples of the
//! vertical midline as two rays meeting at a single point, with a reference
//! object of known width closing the triangle. It is an approximation; the
//! sensor's real optics are not modelled.

use super::frame::DistanceField;
use crate::errors::GeometryError;
use tracing::debug;

/// Conversion from raw sensor units to millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub raw_to_mm: f64,
}

impl Calibration {
    pub fn new(raw_to_mm: f64) -> Self {
        Self { raw_to_mm }
    }

    pub fn to_mm(&self, raw: u16) -> f64 {
        raw as f64 * self.raw_to_mm
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::new(crate::constants::sensor::DEFAULT_RAW_TO_MM)
    }
}

/// Raw distance at pixel (row `height / 2`, column `width / 2`)
pub fn center_distance(field: &DistanceField) -> u16 {
    // Always in bounds: DistanceField has non-zero dimensions
    field
        .get(field.width() / 2, field.height() / 2)
        .unwrap_or_default()
}

/// Mean raw distance of the 2x2 block straddling the field center
///
/// Rows `h/2 - 1 ..= h/2` and columns `w/2 - 1 ..= w/2`, collapsed to a
/// single row or column when that dimension is 1.
pub fn center_mean_distance(field: &DistanceField) -> f64 {
    let (w, h) = (field.width(), field.height());
    let rows = (h / 2).saturating_sub(1)..=(h / 2).min(h - 1);
    let cols = (w / 2).saturating_sub(1)..=(w / 2).min(w - 1);

    let mut sum = 0u64;
    let mut count = 0u64;
    for y in rows {
        for x in cols.clone() {
            if let Some(d) = field.get(x, y) {
                sum += d as u64;
                count += 1;
            }
        }
    }

    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

/// The two midline samples the field-of-view estimate is built on
pub fn midline_extremes(field: &DistanceField) -> (u16, u16) {
    let row = field.height() / 2;
    let left = field.get(0, row).unwrap_or(0);
    let right = field.get(field.width() - 1, row).unwrap_or(0);
    (left, right)
}

/// Angle in degrees between the rays to the left and right midline samples
///
/// `reference_width` is in the same unit as the field's distances.
pub fn field_of_view(field: &DistanceField, reference_width: f64) -> Result<f64, GeometryError> {
    let (left, right) = midline_extremes(field);
    law_of_cosines_angle(left as f64, right as f64, reference_width)
}

/// Like [`field_of_view`], with distances calibrated to millimeters first
pub fn field_of_view_mm(
    field: &DistanceField,
    reference_width_mm: f64,
    calibration: &Calibration,
) -> Result<f64, GeometryError> {
    let (left, right) = midline_extremes(field);
    law_of_cosines_angle(
        calibration.to_mm(left),
        calibration.to_mm(right),
        reference_width_mm,
    )
}

/// Angle opposite `opposite` in a triangle with sides `a`, `b`, `opposite`
pub fn law_of_cosines_angle(a: f64, b: f64, opposite: f64) -> Result<f64, GeometryError> {
    if a == 0.0 || b == 0.0 {
        debug!(left = a, right = b, "Field of view not computable: zero distance");
        return Err(GeometryError::ZeroDistance { left: a, right: b });
    }

    let cosine = (a * a + b * b - opposite * opposite) / (2.0 * a * b);
    if !(-1.0..=1.0).contains(&cosine) {
        debug!(cosine, "Field of view not computable: impossible triangle");
        return Err(GeometryError::DegenerateTriangle { cosine });
    }

    Ok(cosine.acos().to_degrees())
}
