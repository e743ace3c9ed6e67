// SPDX-License-Identifier: GPL-3.0-only

//! Distance fields and the frame builder
//!
//! The builder decodes a full sensor buffer into a [`DistanceField`] of raw
//! distances. Range tracking is explicit: callers pass the [`ObservedRange`]
//! they want updated, and decide themselves whether it lives for one frame or
//! for the whole capture session.

use super::sample::{ConfidencePolicy, decode};
use crate::constants::{BYTES_PER_SAMPLE, pipeline::DEFAULT_CONFIDENCE_THRESHOLD};
use crate::errors::DepthError;
use tracing::debug;

/// Running (min, max) of raw distances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservedRange {
    min: u16,
    max: u16,
}

impl ObservedRange {
    /// Range that has seen no values yet
    pub const EMPTY: Self = Self {
        min: u16::MAX,
        max: 0,
    };

    /// Range spanning `a` and `b` in either order
    pub fn new(a: u16, b: u16) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Range of all values yielded by `values`
    pub fn from_values(values: impl IntoIterator<Item = u16>) -> Self {
        let mut range = Self::EMPTY;
        for v in values {
            range.fold(v);
        }
        range
    }

    /// Widen the range to include `value`
    #[inline]
    pub fn fold(&mut self, value: u16) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Widen the range to include everything `other` has seen
    pub fn merge(&mut self, other: &ObservedRange) {
        if other.is_empty() {
            return;
        }
        self.fold(other.min);
        self.fold(other.max);
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// (min, max), or None when nothing was observed
    pub fn bounds(&self) -> Option<(u16, u16)> {
        (!self.is_empty()).then_some((self.min, self.max))
    }

    pub fn min(&self) -> Option<u16> {
        self.bounds().map(|(min, _)| min)
    }

    pub fn max(&self) -> Option<u16> {
        self.bounds().map(|(_, max)| max)
    }

    /// max - min; zero for empty and single-valued ranges
    pub fn span(&self) -> u16 {
        self.bounds().map(|(min, max)| max - min).unwrap_or(0)
    }
}

impl Default for ObservedRange {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl std::fmt::Display for ObservedRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.bounds() {
            Some((min, max)) => write!(f, "[{}, {}]", min, max),
            None => write!(f, "[empty]"),
        }
    }
}

/// Dense row-major grid of raw decoded distances for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceField {
    width: u32,
    height: u32,
    data: Vec<u16>,
}

impl DistanceField {
    /// Wrap existing distances; `data.len()` must equal `width * height`
    pub fn new(width: u32, height: u32, data: Vec<u16>) -> Result<Self, DepthError> {
        let expected = pixel_count(width, height)?;
        if data.len() != expected {
            return Err(DepthError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Distance at column `x`, row `y`
    pub fn get(&self, x: u32, y: u32) -> Option<u16> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Iterate over rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[u16]> {
        self.data.chunks_exact(self.width as usize)
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u16> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Range of the distances stored in this field
    pub fn observed_range(&self) -> ObservedRange {
        ObservedRange::from_values(self.data.iter().copied())
    }
}

fn pixel_count(width: u32, height: u32) -> Result<usize, DepthError> {
    if width == 0 || height == 0 {
        return Err(DepthError::InvalidDimensions { width, height });
    }
    Ok(width as usize * height as usize)
}

/// Decodes sensor buffers of a fixed resolution into distance fields
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameBuilder {
    width: u32,
    height: u32,
    confidence_threshold: f32,
    policy: ConfidencePolicy,
}

impl FrameBuilder {
    /// Create a builder for the given sensor resolution
    pub fn new(width: u32, height: u32) -> Result<Self, DepthError> {
        pixel_count(width, height)?;
        Ok(Self {
            width,
            height,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            policy: ConfidencePolicy::default(),
        })
    }

    /// Set the confidence threshold and what happens below it
    pub fn with_confidence(mut self, threshold: f32, policy: ConfidencePolicy) -> Self {
        self.confidence_threshold = threshold;
        self.policy = policy;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of samples each buffer must contain
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Decode a buffer without range tracking
    pub fn build(&self, samples: &[u16]) -> Result<DistanceField, DepthError> {
        self.decode_into(samples, |_| {})
    }

    /// Decode a buffer, folding every sensor distance into `range`
    ///
    /// The range sees distances as encoded, before the confidence policy
    /// zeroes anything.
    pub fn build_tracked(
        &self,
        samples: &[u16],
        range: &mut ObservedRange,
    ) -> Result<DistanceField, DepthError> {
        self.decode_into(samples, |raw| range.fold(raw))
    }

    fn decode_into(
        &self,
        samples: &[u16],
        mut observe: impl FnMut(u16),
    ) -> Result<DistanceField, DepthError> {
        let expected = self.pixel_count();
        if samples.len() != expected {
            return Err(DepthError::BufferSize {
                expected,
                actual: samples.len(),
            });
        }

        let data: Vec<u16> = samples
            .iter()
            .map(|&s| {
                let decoded = decode(s, self.confidence_threshold, self.policy);
                observe(decoded.raw_distance);
                decoded.distance
            })
            .collect();

        debug!(
            width = self.width,
            height = self.height,
            policy = ?self.policy,
            "Decoded depth frame"
        );

        Ok(DistanceField {
            width: self.width,
            height: self.height,
            data,
        })
    }
}

/// Split a little-endian DEPTH16 plane into samples
pub fn samples_from_le_bytes(bytes: &[u8]) -> Result<Vec<u16>, DepthError> {
    if bytes.len() % BYTES_PER_SAMPLE != 0 {
        return Err(DepthError::OddByteLength(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(BYTES_PER_SAMPLE)
        .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_is_row_major() {
        let builder = FrameBuilder::new(3, 2).unwrap();
        let field = builder.build(&[0, 1, 2, 10, 11, 12]).unwrap();
        assert_eq!(field.get(0, 0), Some(0));
        assert_eq!(field.get(2, 0), Some(2));
        assert_eq!(field.get(0, 1), Some(10));
        assert_eq!(field.get(2, 1), Some(12));
        assert_eq!(field.get(3, 1), None);
        assert_eq!(field.get(0, 2), None);

        let rows: Vec<&[u16]> = field.rows().collect();
        assert_eq!(rows, vec![&[0u16, 1, 2][..], &[10, 11, 12][..]]);
    }

    #[test]
    fn test_build_strips_confidence_bits() {
        let builder = FrameBuilder::new(2, 1).unwrap();
        let field = builder.build(&[0xE000 | 100, 0x2000 | 7]).unwrap();
        assert_eq!(field.as_slice(), &[100, 7]);
    }

    #[test]
    fn test_build_rejects_wrong_length() {
        let builder = FrameBuilder::new(4, 4).unwrap();
        let err = builder.build(&[0; 15]).unwrap_err();
        assert_eq!(
            err,
            DepthError::BufferSize {
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert_eq!(
            FrameBuilder::new(0, 240).unwrap_err(),
            DepthError::InvalidDimensions {
                width: 0,
                height: 240
            }
        );
        assert!(DistanceField::new(2, 0, vec![]).is_err());
    }

    #[test]
    fn test_tracked_range_persists_across_frames() {
        let builder = FrameBuilder::new(2, 1).unwrap();
        let mut range = ObservedRange::EMPTY;

        builder.build_tracked(&[300, 400], &mut range).unwrap();
        assert_eq!(range.bounds(), Some((300, 400)));

        builder.build_tracked(&[350, 900], &mut range).unwrap();
        assert_eq!(range.bounds(), Some((300, 900)));
    }

    #[test]
    fn test_tracked_range_sees_filtered_samples() {
        let builder =
            FrameBuilder::new(2, 1)
                .unwrap()
                .with_confidence(0.5, ConfidencePolicy::ZeroBelowThreshold);
        let mut range = ObservedRange::EMPTY;
        let field = builder
            .build_tracked(&[(1 << 13) | 50, 700], &mut range)
            .unwrap();

        assert_eq!(field.as_slice(), &[0, 700]);
        assert_eq!(range.bounds(), Some((50, 700)));
    }

    #[test]
    fn test_observed_range_merge_and_empty() {
        let mut range = ObservedRange::default();
        assert!(range.is_empty());
        assert_eq!(range.span(), 0);
        assert_eq!(range.to_string(), "[empty]");

        range.merge(&ObservedRange::EMPTY);
        assert!(range.is_empty());

        range.merge(&ObservedRange::new(20, 10));
        assert_eq!(range.bounds(), Some((10, 20)));
        assert_eq!(range.span(), 10);
        assert_eq!(range.to_string(), "[10, 20]");
    }

    #[test]
    fn test_samples_from_le_bytes() {
        let samples = samples_from_le_bytes(&[0x05, 0x20, 0xFF, 0x1F]).unwrap();
        assert_eq!(samples, vec![0x2005, 0x1FFF]);
        assert_eq!(
            samples_from_le_bytes(&[1, 2, 3]).unwrap_err(),
            DepthError::OddByteLength(3)
        );
    }
}
