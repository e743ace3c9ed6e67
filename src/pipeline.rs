// SPDX-License-Identifier: GPL-3.0-only

//! Per-frame depth pipeline
//!
//! Runs decode → build → normalize → render and the measurements for one
//! sensor buffer at a time. Frames are processed serially; a persistent range
//! lives inside the pipeline and is only mutated through `&mut self`, so there
//! is a single writer by construction.

use crate::config::{PipelineConfig, RangeScope};
use crate::constants::timing::FRAME_LOG_INTERVAL;
use crate::depth::{
    ColorRaster, DisplayTransform, DistanceField, FrameBuilder, ObservedRange, center_distance,
    center_mean_distance, compute_transform, field_of_view_mm, render,
};
use crate::errors::{AppResult, GeometryError};
use tracing::{debug, info};

/// Scalar measurements derived from one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Measurements {
    /// Raw distance at the center pixel
    pub center_distance: u16,
    /// Center pixel distance in millimeters
    pub center_distance_mm: f64,
    /// Mean of the 2x2 center block in millimeters
    pub center_mean_mm: f64,
    /// Field of view in degrees, when a reference width is configured
    pub field_of_view: Option<Result<f64, GeometryError>>,
}

/// Everything produced for one frame
#[derive(Debug, Clone)]
pub struct FrameOutput {
    pub field: DistanceField,
    /// Range the frame was normalized with
    pub range: ObservedRange,
    pub raster: ColorRaster,
    pub measurements: Measurements,
}

pub struct DepthPipeline {
    config: PipelineConfig,
    builder: FrameBuilder,
    session_range: ObservedRange,
    frame_count: u64,
}

impl DepthPipeline {
    /// Create a pipeline from a validated configuration
    pub fn new(config: PipelineConfig) -> AppResult<Self> {
        config.validate()?;
        let builder = config.frame_builder()?;

        info!(
            width = config.width,
            height = config.height,
            policy = config.confidence_policy.display_name(),
            scope = config.range_scope.display_name(),
            normalizer = ?config.normalizer,
            "Depth pipeline initialized"
        );

        Ok(Self {
            config,
            builder,
            session_range: ObservedRange::EMPTY,
            frame_count: 0,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Number of frames processed so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Range accumulated across frames (empty under per-frame scope)
    pub fn session_range(&self) -> ObservedRange {
        self.session_range
    }

    /// Forget everything the persistent range has seen
    pub fn reset_range(&mut self) {
        debug!("Resetting session range");
        self.session_range = ObservedRange::EMPTY;
    }

    /// Process one sensor buffer of `width * height` packed samples
    pub fn process(&mut self, samples: &[u16]) -> AppResult<FrameOutput> {
        let mut frame_range = ObservedRange::EMPTY;
        let field = self.builder.build_tracked(samples, &mut frame_range)?;

        let range = match self.config.range_scope {
            RangeScope::Frame => frame_range,
            RangeScope::Persistent => {
                self.session_range.merge(&frame_range);
                self.session_range
            }
        };

        let normalizer = self.config.normalizer.instantiate(range, self.config.output_max);
        let raster = render(&field, &normalizer, self.config.color_ramp);
        let measurements = self.measure(&field);

        self.frame_count += 1;
        debug!(
            frame = self.frame_count,
            range = %range,
            center = measurements.center_distance,
            "Processed depth frame"
        );
        if self.frame_count % FRAME_LOG_INTERVAL == 0 {
            info!(
                frames = self.frame_count,
                range = %range,
                center_mm = measurements.center_mean_mm,
                "Depth pipeline status"
            );
        }

        Ok(FrameOutput {
            field,
            range,
            raster,
            measurements,
        })
    }

    /// Measurements for an already decoded field
    pub fn measure(&self, field: &DistanceField) -> Measurements {
        let calibration = self.config.calibration();
        let center = center_distance(field);

        Measurements {
            center_distance: center,
            center_distance_mm: calibration.to_mm(center),
            center_mean_mm: center_mean_distance(field) * calibration.raw_to_mm,
            field_of_view: self
                .config
                .reference_width_mm
                .map(|width| field_of_view_mm(field, width, &calibration)),
        }
    }

    /// Placement of the raster on a surface of the given size
    pub fn surface_transform(&self, surface_width: u32, surface_height: u32) -> DisplayTransform {
        compute_transform(
            self.config.width,
            self.config.height,
            surface_width,
            surface_height,
            self.config.rotation.degrees() as f32,
        )
    }
}
