// SPDX-License-Identifier: GPL-3.0-only

//! ToF Depth - DEPTH16 time-of-flight frame decoding and visualization
//!
//! This library turns packed 16-bit depth samples into distance fields,
//! display rasters and simple geometric measurements.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`depth`]: Sample decoding, frame building, normalization, rendering and geometry
//! - [`pipeline`]: Per-frame orchestration of the depth modules
//! - [`config`]: Pipeline configuration
//! - [`terminal`]: Terminal preview of rendered frames
//!
//! # Example
//!
//! ```
//! use tof_depth::{DepthPipeline, PipelineConfig};
//!
//! let config = PipelineConfig {
//!     width: 2,
//!     height: 2,
//!     ..Default::default()
//! };
//! let mut pipeline = DepthPipeline::new(config).unwrap();
//! let output = pipeline.process(&[100, 200, 300, 400]).unwrap();
//! assert_eq!(output.measurements.center_distance, 400);
//! ```

pub mod config;
pub mod constants;
pub mod depth;
pub mod errors;
pub mod pipeline;
pub mod terminal;

// Re-export commonly used types
pub use config::{PipelineConfig, RangeScope};
pub use errors::{AppError, AppResult};
pub use pipeline::{DepthPipeline, FrameOutput, Measurements};
