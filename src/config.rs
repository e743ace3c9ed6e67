// SPDX-License-Identifier: GPL-3.0-only

//! Pipeline configuration
//!
//! Stored as JSON under the user's config directory. Missing keys fall back
//! to the defaults, so older files keep loading as fields are added.

use crate::constants::{app_info, pipeline, sensor};
use crate::depth::{
    Calibration, ColorRamp, ConfidencePolicy, FrameBuilder, NormalizerKind, SensorRotation,
};
use crate::errors::{ConfigError, DepthError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Lifetime of the observed range used by dynamic normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RangeScope {
    /// Reset for every frame (per-frame contrast stretch)
    #[default]
    Frame,
    /// Accumulated over the whole session (running calibration)
    Persistent,
}

impl RangeScope {
    /// Get display name for the scope
    pub fn display_name(&self) -> &'static str {
        match self {
            RangeScope::Frame => "Per frame",
            RangeScope::Persistent => "Persistent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Depth plane width (sensor resolution)
    pub width: u32,
    /// Depth plane height (sensor resolution)
    pub height: u32,
    /// Confidence level at or below which a sample counts as unreliable
    pub confidence_threshold: f32,
    /// Whether unreliable samples are zeroed or kept
    pub confidence_policy: ConfidencePolicy,
    /// Lifetime of the observed range
    pub range_scope: RangeScope,
    /// Fixed cutoff or dynamic range normalization
    pub normalizer: NormalizerKind,
    /// Upper bound of normalized values (255 for 8-bit, 65535 for 16-bit)
    pub output_max: u16,
    /// Color ramp for the preview raster
    pub color_ramp: ColorRamp,
    /// Sensor mounting rotation relative to the display
    pub rotation: SensorRotation,
    /// Raw unit to millimeter factor
    pub raw_to_mm: f64,
    /// Width of the reference object used for field-of-view estimation (mm)
    pub reference_width_mm: Option<f64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            width: sensor::DEFAULT_WIDTH,
            height: sensor::DEFAULT_HEIGHT,
            confidence_threshold: pipeline::DEFAULT_CONFIDENCE_THRESHOLD,
            confidence_policy: ConfidencePolicy::default(), // Pass through
            range_scope: RangeScope::default(),              // Per frame
            normalizer: NormalizerKind::default(),           // Dynamic
            output_max: pipeline::DEFAULT_OUTPUT_MAX,
            color_ramp: ColorRamp::default(), // Green channel
            rotation: SensorRotation::from_degrees_int(sensor::DEFAULT_ROTATION_DEGREES),
            raw_to_mm: sensor::DEFAULT_RAW_TO_MM,
            reference_width_mm: None,
        }
    }
}

impl PipelineConfig {
    /// Default config file location, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| {
            dir.join(app_info::CONFIG_DIR_NAME)
                .join(app_info::CONFIG_FILE_NAME)
        })
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load from `path` (or the default location); fall back to defaults if absent
    ///
    /// A file that exists but fails to parse or validate is still an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => {
                    warn!("No config directory available, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        Self::load(&path)
    }

    /// Write the config as pretty-printed JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Check every value is within its allowed range
    pub fn validate(&self) -> Result<(), ConfigError> {
        let result = self.check();
        if let Err(e) = &result {
            warn!(error = %e, "Rejected configuration");
        }
        result
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "sensor resolution {}x{} must be non-zero",
                self.width, self.height
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::Invalid(format!(
                "confidence_threshold {} outside [0, 1]",
                self.confidence_threshold
            )));
        }
        if self.output_max == 0 {
            return Err(ConfigError::Invalid("output_max must be non-zero".into()));
        }
        if let NormalizerKind::Fixed { max_distance: 0 } = self.normalizer {
            return Err(ConfigError::Invalid(
                "fixed normalizer max_distance must be non-zero".into(),
            ));
        }
        if !self.raw_to_mm.is_finite() || self.raw_to_mm <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "raw_to_mm {} must be a positive number",
                self.raw_to_mm
            )));
        }
        if let Some(width) = self.reference_width_mm
            && (!width.is_finite() || width <= 0.0)
        {
            return Err(ConfigError::Invalid(format!(
                "reference_width_mm {} must be a positive number",
                width
            )));
        }
        Ok(())
    }

    /// Frame builder for the configured sensor layout and confidence handling
    pub fn frame_builder(&self) -> Result<FrameBuilder, DepthError> {
        Ok(FrameBuilder::new(self.width, self.height)?
            .with_confidence(self.confidence_threshold, self.confidence_policy))
    }

    pub fn calibration(&self) -> Calibration {
        Calibration::new(self.raw_to_mm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!((config.width, config.height), (320, 240));
        assert_eq!(config.rotation, SensorRotation::Rotate90);
        assert_eq!(config.confidence_policy, ConfidencePolicy::PassThrough);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PipelineConfig = serde_json::from_str(
            r#"{ "width": 640, "normalizer": { "kind": "fixed", "max_distance": 4000 } }"#,
        )
        .unwrap();
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 240);
        assert_eq!(config.normalizer, NormalizerKind::Fixed { max_distance: 4000 });
    }

    #[test]
    fn test_invalid_values_rejected() {
        let cases = [
            PipelineConfig {
                width: 0,
                ..Default::default()
            },
            PipelineConfig {
                confidence_threshold: 1.5,
                ..Default::default()
            },
            PipelineConfig {
                output_max: 0,
                ..Default::default()
            },
            PipelineConfig {
                normalizer: NormalizerKind::Fixed { max_distance: 0 },
                ..Default::default()
            },
            PipelineConfig {
                raw_to_mm: f64::NAN,
                ..Default::default()
            },
            PipelineConfig {
                reference_width_mm: Some(-1.0),
                ..Default::default()
            },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid(_))),
                "{:?} should be rejected",
                config
            );
        }
    }
}
