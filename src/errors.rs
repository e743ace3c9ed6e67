// SPDX-License-Identifier: GPL-3.0-only

//! Error types for depth decoding, measurement and configuration

use std::fmt;
use std::path::PathBuf;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Frame decoding errors
    Depth(DepthError),
    /// Reading an input file failed
    Io { path: PathBuf, message: String },
    /// Configuration errors
    Config(ConfigError),
    /// Generic error with message
    Other(String),
}

/// Frame decoding errors
///
/// All of these are caller bugs: the buffer handed over by the capture side
/// does not match the configured sensor layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepthError {
    /// Sample count does not equal width * height
    BufferSize { expected: usize, actual: usize },
    /// Width or height is zero
    InvalidDimensions { width: u32, height: u32 },
    /// Byte buffer cannot be split into 16-bit samples
    OddByteLength(usize),
    /// A multi-frame dump does not end on a frame boundary
    PartialFrame { frame_len: usize, samples: usize },
}

/// Measurements that cannot be computed from the frame
///
/// Not part of [`AppError`]: a frame without a field of view is still a
/// valid frame, so these travel inside the measurements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryError {
    /// One of the sampled distances is zero (no return or filtered out)
    ZeroDistance { left: f64, right: f64 },
    /// Law-of-cosines argument outside [-1, 1]; the three sides cannot form a triangle
    DegenerateTriangle { cosine: f64 },
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Reading or writing the configuration file failed
    Io(String),
    /// Configuration file is not valid JSON for this schema
    Parse(String),
    /// A value is outside its allowed range
    Invalid(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Depth(e) => write!(f, "Depth frame error: {}", e),
            AppError::Io { path, message } => {
                write!(f, "Cannot read {}: {}", path.display(), message)
            }
            AppError::Config(e) => write!(f, "Configuration error: {}", e),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for DepthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepthError::BufferSize { expected, actual } => write!(
                f,
                "Buffer holds {} samples, sensor layout requires {}",
                actual, expected
            ),
            DepthError::InvalidDimensions { width, height } => {
                write!(f, "Invalid frame dimensions {}x{}", width, height)
            }
            DepthError::OddByteLength(len) => {
                write!(f, "Byte length {} is not a multiple of 2", len)
            }
            DepthError::PartialFrame { frame_len, samples } => write!(
                f,
                "Dump of {} samples is not a whole number of {}-sample frames",
                samples, frame_len
            ),
        }
    }
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::ZeroDistance { left, right } => write!(
                f,
                "Not computable: zero distance (left={}, right={})",
                left, right
            ),
            GeometryError::DegenerateTriangle { cosine } => write!(
                f,
                "Not computable: impossible triangle (cosine={:.4})",
                cosine
            ),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "I/O failed: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Parse failed: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "Invalid value: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for DepthError {}
impl std::error::Error for GeometryError {}
impl std::error::Error for ConfigError {}

impl From<DepthError> for AppError {
    fn from(err: DepthError) -> Self {
        AppError::Depth(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
