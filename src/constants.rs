// SPDX-License-Identifier: GPL-3.0-only

//! Sensor layout and pipeline defaults
//!
//! Single source of truth for the DEPTH16 bit layout and the default values
//! used when no configuration file is present.

/// Mask selecting the 13 distance bits of a DEPTH16 sample
pub const DISTANCE_MASK: u16 = 0x1FFF;

/// Bit offset of the 3-bit confidence code
pub const CONFIDENCE_SHIFT: u32 = 13;

/// Mask applied to the confidence code after shifting
pub const CONFIDENCE_MASK: u16 = 0x7;

/// Bytes per packed sample in the sensor buffer
pub const BYTES_PER_SAMPLE: usize = 2;

/// Sensor defaults (ToF module of the reference handset)
pub mod sensor {
    /// Depth plane width in pixels
    pub const DEFAULT_WIDTH: u32 = 320;
    /// Depth plane height in pixels
    pub const DEFAULT_HEIGHT: u32 = 240;
    /// Raw unit to millimeter factor; the sensor reports millimeters directly
    pub const DEFAULT_RAW_TO_MM: f64 = 1.0;
    /// Sensor mounting rotation relative to the display, clockwise degrees
    pub const DEFAULT_ROTATION_DEGREES: i32 = 90;
}

/// Normalization and decoding defaults
pub mod pipeline {
    /// Confidence at or below which samples are considered unreliable
    pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.1;

    /// Display range for 8-bit visualization
    pub const DEFAULT_OUTPUT_MAX: u16 = 255;

    /// Fixed-cutoff normalizer's `max_distance` when the config omits it
    pub const DEFAULT_MAX_DISTANCE: u16 = 8192;
}

/// Logging cadence
pub mod timing {
    /// Frame counter modulo for periodic summaries
    pub const FRAME_LOG_INTERVAL: u64 = 30;
}

/// Application information utilities
pub mod app_info {
    /// Application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }

    /// Directory name used under the user's config directory
    pub const CONFIG_DIR_NAME: &str = "tof-depth";

    /// Configuration file name
    pub const CONFIG_FILE_NAME: &str = "config.json";
}
