// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tof_depth::constants::app_info;
use tof_depth::depth::ColorRamp;

mod cli;

#[derive(Parser)]
#[command(name = "tof-depth")]
#[command(about = "Decode, measure and preview DEPTH16 depth frames")]
#[command(version = app_info::version())]
struct Cli {
    /// Configuration file (default: <config dir>/tof-depth/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print range and measurements for every frame of a raw DEPTH16 dump
    Inspect {
        /// Little-endian DEPTH16 file, one or more frames back to back
        input: PathBuf,

        /// Reference object width in millimeters (enables field-of-view estimation)
        #[arg(short, long)]
        reference_width: Option<f64>,
    },

    /// Draw one frame of a raw DEPTH16 dump in the terminal
    Preview {
        /// Little-endian DEPTH16 file, one or more frames back to back
        input: PathBuf,

        /// Frame index within the file
        #[arg(short, long, default_value = "0")]
        frame: usize,

        /// Color ramp (overrides the configuration)
        #[arg(long)]
        ramp: Option<RampArg>,
    },

    /// Print the effective configuration
    Config {
        /// Save it to the configuration file as well
        #[arg(short, long)]
        write: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RampArg {
    Green,
    Grayscale,
    Turbo,
}

impl From<RampArg> for ColorRamp {
    fn from(arg: RampArg) -> Self {
        match arg {
            RampArg::Green => ColorRamp::Green,
            RampArg::Grayscale => ColorRamp::Grayscale,
            RampArg::Turbo => ColorRamp::Turbo,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=tof_depth=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Inspect {
            input,
            reference_width,
        } => cli::inspect(config_path, &input, reference_width),
        Commands::Preview { input, frame, ramp } => {
            cli::preview(config_path, &input, frame, ramp.map(ColorRamp::from))
        }
        Commands::Config { write } => cli::show_config(config_path, write),
    }
}
