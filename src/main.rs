use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;

use swirl_fluids::error::FluidError;
use swirl_io::{decode::DecodingError, encode::EncodingError};

use config::ConfigError;

mod config;
mod run;

#[derive(Parser)]
#[command(version, about = "Headless stable-fluids simulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a simulation, optionally recording every frame.
    Run {
        /// YAML configuration file. Defaults are used when it does not exist.
        #[arg(short, long, default_value = "swirl.yaml")]
        config: PathBuf,
        /// Directory to record frames into. Must not exist yet.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Number of frames to simulate.
        #[arg(short, long)]
        frames: Option<u64>,
        /// Edge length of the grid, in cells.
        #[arg(short, long)]
        size: Option<usize>,
    },
    /// Log per-frame diagnostics of a recording.
    Inspect {
        path: PathBuf,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fluid(#[from] FluidError),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Decoding(#[from] DecodingError),
    #[error(transparent)]
    Progress(#[from] indicatif::style::TemplateError),
}

fn main() -> Result<(), CliError> {
    env_logger::init();

    match Cli::parse().command {
        Command::Run { config, output, frames, size } => {
            let mut config = config::load(&config)?;

            if let Some(frames) = frames {
                config.run.frames = frames;
            }
            if let Some(size) = size {
                config.physics.size = size;
            }

            run::run(&config, output)
        }
        Command::Inspect { path } => run::inspect(path),
    }
}
