// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for depth dumps
//!
//! This module provides command-line functionality for:
//! - Inspecting the frames of a raw DEPTH16 file
//! - Previewing a frame in the terminal
//! - Showing and saving the configuration

use std::path::Path;
use tof_depth::config::PipelineConfig;
use tof_depth::depth::{ColorRamp, samples_from_le_bytes};
use tof_depth::errors::{AppError, DepthError};
use tof_depth::pipeline::{DepthPipeline, FrameOutput};
use tof_depth::terminal;
use tracing::info;

/// Split samples into frames of `frame_len`, rejecting a trailing partial frame
fn split_frames(samples: &[u16], frame_len: usize) -> Result<Vec<Vec<u16>>, DepthError> {
    if samples.is_empty() || frame_len == 0 || samples.len() % frame_len != 0 {
        return Err(DepthError::PartialFrame {
            frame_len,
            samples: samples.len(),
        });
    }
    Ok(samples.chunks_exact(frame_len).map(<[u16]>::to_vec).collect())
}

/// Read a raw dump and split it into per-frame sample buffers
fn read_frames(input: &Path, config: &PipelineConfig) -> Result<Vec<Vec<u16>>, AppError> {
    let bytes = std::fs::read(input).map_err(|e| AppError::Io {
        path: input.to_path_buf(),
        message: e.to_string(),
    })?;
    let samples = samples_from_le_bytes(&bytes)?;

    let frame_len = config.width as usize * config.height as usize;
    let frames = split_frames(&samples, frame_len)?;

    info!(
        path = %input.display(),
        frames = frames.len(),
        "Read depth dump"
    );
    Ok(frames)
}

/// Run frames `0..=index` through the pipeline and return the last output
///
/// Earlier frames are processed so a persistent range has seen them.
fn process_up_to(
    pipeline: &mut DepthPipeline,
    frames: &[Vec<u16>],
    index: usize,
) -> Result<FrameOutput, AppError> {
    let Some(target) = frames.get(index) else {
        return Err(AppError::Other(format!(
            "Frame index {} out of range (0-{})",
            index,
            frames.len().saturating_sub(1)
        )));
    };
    for samples in &frames[..index] {
        pipeline.process(samples)?;
    }
    pipeline.process(target)
}

fn format_measurements(output: &FrameOutput) -> String {
    let m = &output.measurements;
    let mut line = format!(
        "range {}  center {} ({:.1} mm, 2x2 mean {:.1} mm)",
        output.range, m.center_distance, m.center_distance_mm, m.center_mean_mm
    );
    match &m.field_of_view {
        Some(Ok(degrees)) => line.push_str(&format!("  fov {:.2}°", degrees)),
        Some(Err(e)) => line.push_str(&format!("  fov n/a ({})", e)),
        None => {}
    }
    line
}

/// Print range and measurements for every frame in `input`
pub fn inspect(
    config_path: Option<&Path>,
    input: &Path,
    reference_width: Option<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = PipelineConfig::load_or_default(config_path)?;
    if reference_width.is_some() {
        config.reference_width_mm = reference_width;
    }

    let frames = read_frames(input, &config)?;
    let mut pipeline = DepthPipeline::new(config)?;

    println!(
        "{} frame(s) of {}x{}",
        frames.len(),
        pipeline.config().width,
        pipeline.config().height
    );
    for (index, samples) in frames.iter().enumerate() {
        let output = pipeline.process(samples)?;
        println!("  [{}] {}", index, format_measurements(&output));
    }

    Ok(())
}

/// Draw frame `frame_index` of `input` in the terminal
pub fn preview(
    config_path: Option<&Path>,
    input: &Path,
    frame_index: usize,
    ramp: Option<ColorRamp>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = PipelineConfig::load_or_default(config_path)?;
    if let Some(ramp) = ramp {
        config.color_ramp = ramp;
    }

    let frames = read_frames(input, &config)?;

    let rotation = config.rotation.degrees() as f32;
    let mut pipeline = DepthPipeline::new(config)?;
    let output = process_up_to(&mut pipeline, &frames, frame_index)?;

    let status = format!("[{}] {}", frame_index, format_measurements(&output));
    terminal::preview(&output.raster, rotation, &status)
}

/// Print the effective configuration, optionally saving it
pub fn show_config(
    config_path: Option<&Path>,
    write: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = PipelineConfig::load_or_default(config_path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);

    if write {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => PipelineConfig::default_path().ok_or("No config directory available")?,
        };
        config.save(&path)?;
        println!("Configuration saved: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tof_depth::config::RangeScope;

    fn config(width: u32, height: u32) -> PipelineConfig {
        PipelineConfig {
            width,
            height,
            ..Default::default()
        }
    }

    fn write_dump(samples: &[u16]) -> tempfile::NamedTempFile {
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), bytes).unwrap();
        file
    }

    #[test]
    fn test_read_frames_splits_dump() {
        let dump = write_dump(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let frames = read_frames(dump.path(), &config(2, 2)).unwrap();
        assert_eq!(frames, vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8]]);
    }

    #[test]
    fn test_read_frames_rejects_trailing_partial_frame() {
        let dump = write_dump(&[1, 2, 3, 4, 5, 6]);
        let err = read_frames(dump.path(), &config(2, 2)).unwrap_err();
        assert_eq!(
            err,
            AppError::Depth(DepthError::PartialFrame {
                frame_len: 4,
                samples: 6
            })
        );
    }

    #[test]
    fn test_read_frames_rejects_empty_dump() {
        let dump = write_dump(&[]);
        assert!(matches!(
            read_frames(dump.path(), &config(2, 2)),
            Err(AppError::Depth(DepthError::PartialFrame { samples: 0, .. }))
        ));
    }

    #[test]
    fn test_read_frames_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.raw");
        match read_frames(&path, &config(2, 2)) {
            Err(AppError::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected I/O error, got {:?}", other),
        }
    }

    #[test]
    fn test_process_up_to_accumulates_persistent_range() {
        let frames = vec![vec![100, 200, 300, 400], vec![500, 500, 500, 600]];
        let mut pipeline = DepthPipeline::new(PipelineConfig {
            range_scope: RangeScope::Persistent,
            ..config(2, 2)
        })
        .unwrap();

        let output = process_up_to(&mut pipeline, &frames, 1).unwrap();
        assert_eq!(output.range.bounds(), Some((100, 600)));
        assert_eq!(pipeline.frame_count(), 2);
    }

    #[test]
    fn test_process_up_to_out_of_range() {
        let frames = vec![vec![0; 4]];
        let mut pipeline = DepthPipeline::new(config(2, 2)).unwrap();
        assert!(matches!(
            process_up_to(&mut pipeline, &frames, 3),
            Err(AppError::Other(_))
        ));
        assert_eq!(pipeline.frame_count(), 0);
    }
}
