// SPDX-License-Identifier: GPL-3.0-only

//! Mapping raw distances into a bounded display range
//!
//! Both strategies floor the scaled value, so every output lies in
//! `[0, output_max]` and the mapping is monotonic non-decreasing.

use super::frame::{DistanceField, ObservedRange};
use crate::constants::pipeline::DEFAULT_MAX_DISTANCE;
use serde::{Deserialize, Serialize};

/// Maps a raw distance into `[0, output_max]`
pub trait Normalizer {
    /// Largest value `normalize` can return
    fn output_max(&self) -> u16;

    fn normalize(&self, raw: u16) -> u16;
}

/// Linear scale up to a constant cutoff; anything beyond saturates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedCutoff {
    pub max_distance: u16,
    pub output_max: u16,
}

impl FixedCutoff {
    pub fn new(max_distance: u16, output_max: u16) -> Self {
        Self {
            max_distance,
            output_max,
        }
    }
}

impl Normalizer for FixedCutoff {
    fn output_max(&self) -> u16 {
        self.output_max
    }

    fn normalize(&self, raw: u16) -> u16 {
        if raw > self.max_distance {
            return self.output_max;
        }
        if self.max_distance == 0 {
            // Only raw == 0 reaches here
            return 0;
        }
        scale(raw as f64 / self.max_distance as f64, self.output_max)
    }
}

/// Contrast stretch over an observed range
///
/// A degenerate range (empty, or max == min) maps everything to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DynamicRange {
    pub range: ObservedRange,
    pub output_max: u16,
}

impl DynamicRange {
    pub fn new(range: ObservedRange, output_max: u16) -> Self {
        Self { range, output_max }
    }
}

impl Normalizer for DynamicRange {
    fn output_max(&self) -> u16 {
        self.output_max
    }

    fn normalize(&self, raw: u16) -> u16 {
        let Some((min, max)) = self.range.bounds() else {
            return 0;
        };
        if max == min {
            return 0;
        }
        let clamped = raw.clamp(min, max);
        scale((clamped - min) as f64 / (max - min) as f64, self.output_max)
    }
}

#[inline]
fn scale(fraction: f64, output_max: u16) -> u16 {
    ((fraction * output_max as f64).floor() as u16).min(output_max)
}

/// Normalizer selection as stored in the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NormalizerKind {
    /// Constant cutoff in raw units
    Fixed {
        #[serde(default = "default_max_distance")]
        max_distance: u16,
    },
    /// Stretch over the observed range
    #[default]
    Dynamic,
}

impl NormalizerKind {
    /// Instantiate the strategy; `range` is only consulted by the dynamic variant
    pub fn instantiate(&self, range: ObservedRange, output_max: u16) -> RangeNormalizer {
        match *self {
            NormalizerKind::Fixed { max_distance } => {
                RangeNormalizer::Fixed(FixedCutoff::new(max_distance, output_max))
            }
            NormalizerKind::Dynamic => {
                RangeNormalizer::Dynamic(DynamicRange::new(range, output_max))
            }
        }
    }
}

fn default_max_distance() -> u16 {
    DEFAULT_MAX_DISTANCE
}

/// Either strategy, chosen at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeNormalizer {
    Fixed(FixedCutoff),
    Dynamic(DynamicRange),
}

impl Normalizer for RangeNormalizer {
    fn output_max(&self) -> u16 {
        match self {
            RangeNormalizer::Fixed(n) => n.output_max(),
            RangeNormalizer::Dynamic(n) => n.output_max(),
        }
    }

    fn normalize(&self, raw: u16) -> u16 {
        match self {
            RangeNormalizer::Fixed(n) => n.normalize(raw),
            RangeNormalizer::Dynamic(n) => n.normalize(raw),
        }
    }
}

/// Display values in `[0, output_max]`, one per pixel of the source field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedField {
    width: u32,
    height: u32,
    output_max: u16,
    values: Vec<u16>,
}

impl NormalizedField {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn output_max(&self) -> u16 {
        self.output_max
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.values
    }

    /// Value rescaled to a single byte of intensity
    pub fn intensity(&self, index: usize) -> u8 {
        match (self.values.get(index), self.output_max) {
            (Some(_), 0) | (None, _) => 0,
            (Some(&v), max) => (v as u32 * 255 / max as u32) as u8,
        }
    }
}

/// Normalize every pixel of a field
pub fn normalize_field<N: Normalizer + ?Sized>(
    field: &DistanceField,
    normalizer: &N,
) -> NormalizedField {
    NormalizedField {
        width: field.width(),
        height: field.height(),
        output_max: normalizer.output_max(),
        values: field
            .as_slice()
            .iter()
            .map(|&raw| normalizer.normalize(raw))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_cutoff_reference_values() {
        let n = FixedCutoff::new(8192, 255);
        assert_eq!(n.normalize(4096), 127);
        assert_eq!(n.normalize(9000), 255);
        assert_eq!(n.normalize(8192), 255);
        assert_eq!(n.normalize(0), 0);
    }

    #[test]
    fn test_fixed_cutoff_zero_max_distance() {
        let n = FixedCutoff::new(0, 255);
        assert_eq!(n.normalize(0), 0);
        assert_eq!(n.normalize(1), 255);
    }

    #[test]
    fn test_fixed_cutoff_sixteen_bit_output() {
        let n = FixedCutoff::new(8191, u16::MAX);
        assert_eq!(n.normalize(8191), u16::MAX);
        assert_eq!(n.normalize(u16::MAX), u16::MAX);
    }

    #[test]
    fn test_dynamic_range_stretch() {
        let n = DynamicRange::new(ObservedRange::new(100, 200), 255);
        assert_eq!(n.normalize(50), 0);
        assert_eq!(n.normalize(100), 0);
        assert_eq!(n.normalize(150), 127);
        assert_eq!(n.normalize(200), 255);
        assert_eq!(n.normalize(5000), 255);
    }

    #[test]
    fn test_dynamic_range_degenerate() {
        let flat = DynamicRange::new(ObservedRange::new(0, 0), 255);
        let empty = DynamicRange::new(ObservedRange::EMPTY, 255);
        for raw in [0u16, 1, 8191] {
            assert_eq!(flat.normalize(raw), 0);
            assert_eq!(empty.normalize(raw), 0);
        }
    }

    #[test]
    fn test_outputs_bounded_and_monotonic() {
        let normalizers = [
            RangeNormalizer::Fixed(FixedCutoff::new(4000, 255)),
            RangeNormalizer::Fixed(FixedCutoff::new(8192, 65535)),
            RangeNormalizer::Dynamic(DynamicRange::new(ObservedRange::new(400, 5000), 255)),
            RangeNormalizer::Dynamic(DynamicRange::new(ObservedRange::new(1, 8191), 1023)),
        ];
        for n in normalizers {
            let mut prev = 0u16;
            for raw in 0..=8191u16 {
                let v = n.normalize(raw);
                assert!(v <= n.output_max());
                assert!(v >= prev, "{:?} not monotonic at {}", n, raw);
                prev = v;
            }
        }
    }

    #[test]
    fn test_kind_instantiate() {
        let range = ObservedRange::new(10, 20);
        assert_eq!(
            NormalizerKind::Fixed { max_distance: 100 }.instantiate(range, 255),
            RangeNormalizer::Fixed(FixedCutoff::new(100, 255))
        );
        assert_eq!(
            NormalizerKind::Dynamic.instantiate(range, 255),
            RangeNormalizer::Dynamic(DynamicRange::new(range, 255))
        );
    }

    #[test]
    fn test_kind_fixed_without_cutoff_uses_default() {
        let kind: NormalizerKind = serde_json::from_str(r#"{"kind":"fixed"}"#).unwrap();
        assert_eq!(
            kind,
            NormalizerKind::Fixed {
                max_distance: DEFAULT_MAX_DISTANCE
            }
        );

        let kind: NormalizerKind =
            serde_json::from_str(r#"{"kind":"fixed","max_distance":4000}"#).unwrap();
        assert_eq!(kind, NormalizerKind::Fixed { max_distance: 4000 });
    }

    #[test]
    fn test_normalize_constant_field_dynamic() {
        let field = DistanceField::new(3, 2, vec![777; 6]).unwrap();
        let n = DynamicRange::new(field.observed_range(), 255);
        let normalized = normalize_field(&field, &n);
        assert!(normalized.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_intensity_rescales_to_byte() {
        let field = DistanceField::new(2, 1, vec![0, 8192]).unwrap();
        let normalized = normalize_field(&field, &FixedCutoff::new(8192, 65535));
        assert_eq!(normalized.intensity(0), 0);
        assert_eq!(normalized.intensity(1), 255);
        assert_eq!(normalized.intensity(2), 0);
    }
}
