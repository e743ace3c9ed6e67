// SPDX-License-Identifier: GPL-3.0-only

//! DEPTH16 sample decoding
//!
//! A DEPTH16 sample packs a 13-bit distance and a 3-bit confidence code:
//! ```text
//! [C2 C1 C0 | D12 .. D0]
//! ```
//! Confidence code 0 means full confidence; codes 1..=7 map to `(code - 1) / 7`.

use crate::constants::{CONFIDENCE_MASK, CONFIDENCE_SHIFT, DISTANCE_MASK};
use serde::{Deserialize, Serialize};

/// What to do with samples whose confidence does not exceed the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfidencePolicy {
    /// Keep every distance; confidence is reported but not applied
    #[default]
    PassThrough,
    /// Replace distances with confidence <= threshold by 0
    ZeroBelowThreshold,
}

impl ConfidencePolicy {
    /// Get display name for the policy
    pub fn display_name(&self) -> &'static str {
        match self {
            ConfidencePolicy::PassThrough => "Pass through",
            ConfidencePolicy::ZeroBelowThreshold => "Zero below threshold",
        }
    }
}

/// One decoded sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthSample {
    /// Distance in raw units after the confidence policy was applied
    pub distance: u16,
    /// Distance as encoded by the sensor, before any filtering
    pub raw_distance: u16,
    /// Confidence in [0.0, 1.0]
    pub confidence: f32,
}

/// Extract the raw distance bits
#[inline]
pub fn raw_distance(sample: u16) -> u16 {
    sample & DISTANCE_MASK
}

/// Extract the 3-bit confidence code
#[inline]
pub fn confidence_code(sample: u16) -> u8 {
    ((sample >> CONFIDENCE_SHIFT) & CONFIDENCE_MASK) as u8
}

/// Map a confidence code to a confidence level
#[inline]
pub fn confidence_level(code: u8) -> f32 {
    if code == 0 {
        1.0
    } else {
        (code - 1) as f32 / 7.0
    }
}

/// Decode a packed sample under the given threshold and policy
///
/// Total over all 16-bit inputs.
#[inline]
pub fn decode(sample: u16, confidence_threshold: f32, policy: ConfidencePolicy) -> DepthSample {
    let raw = raw_distance(sample);
    let confidence = confidence_level(confidence_code(sample));

    let distance = match policy {
        ConfidencePolicy::PassThrough => raw,
        ConfidencePolicy::ZeroBelowThreshold if confidence <= confidence_threshold => 0,
        ConfidencePolicy::ZeroBelowThreshold => raw,
    };

    DepthSample {
        distance,
        raw_distance: raw,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_low_confidence_sample() {
        let sample = decode(0b0010_0000_0000_0101, 0.1, ConfidencePolicy::PassThrough);
        assert_eq!(sample.distance, 5);
        assert_eq!(sample.confidence, 0.0);
    }

    #[test]
    fn test_decode_full_distance_full_confidence() {
        let sample = decode(0x1FFF, 0.1, ConfidencePolicy::PassThrough);
        assert_eq!(sample.distance, 8191);
        assert_eq!(sample.confidence, 1.0);
    }

    #[test]
    fn test_all_samples_decode_within_range() {
        for s in 0..=u16::MAX {
            let decoded = decode(s, 0.1, ConfidencePolicy::PassThrough);
            assert_eq!(decoded.distance, s & 0x1FFF);
            assert!(decoded.distance <= 8191);

            let code = s >> 13;
            let expected = if code == 0 {
                1.0
            } else {
                (code - 1) as f32 / 7.0
            };
            assert_eq!(decoded.confidence, expected);
        }
    }

    #[test]
    fn test_zero_below_threshold_policy() {
        // code 1 -> 0.0, code 2 -> 1/7 (~0.143)
        let policy = ConfidencePolicy::ZeroBelowThreshold;
        assert_eq!(decode((1 << 13) | 500, 0.1, policy).distance, 0);
        assert_eq!(decode((2 << 13) | 500, 0.1, policy).distance, 500);
        // Confidence equal to the threshold is filtered too
        assert_eq!(decode((2 << 13) | 500, 1.0 / 7.0, policy).distance, 0);
        // Code 0 is full confidence and always kept
        assert_eq!(decode(500, 0.99, policy).distance, 500);
    }

    #[test]
    fn test_filtered_sample_keeps_raw_distance() {
        let sample = decode((1 << 13) | 42, 0.5, ConfidencePolicy::ZeroBelowThreshold);
        assert_eq!(sample.distance, 0);
        assert_eq!(sample.raw_distance, 42);
    }
}
