// SPDX-License-Identifier: GPL-3.0-only

//! DEPTH16 decoding and visualization
//!
//! Data flows leaf-first through these modules:
//! packed samples → [`sample`] → [`frame`] → distance field, which feeds both
//! [`normalize`] → [`render`] (+ [`transform`] for placement) and [`geometry`].

pub mod frame;
pub mod geometry;
pub mod normalize;
pub mod render;
pub mod sample;
pub mod transform;

pub use frame::{DistanceField, FrameBuilder, ObservedRange, samples_from_le_bytes};
pub use geometry::{
    Calibration, center_distance, center_mean_distance, field_of_view, field_of_view_mm,
};
pub use normalize::{
    DynamicRange, FixedCutoff, NormalizedField, Normalizer, NormalizerKind, RangeNormalizer,
    normalize_field,
};
pub use render::{ColorRamp, ColorRaster, render, render_normalized};
pub use sample::{ConfidencePolicy, DepthSample, decode};
pub use transform::{DisplayTransform, SensorRotation, compute_transform};
