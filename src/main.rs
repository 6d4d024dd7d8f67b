use std::path::PathBuf;

use clap::{Parser, Subcommand};
use config::{Config, ConfigError};
use eddy_io::{decode::{DecodingError, FluidDataDecoder}, encode::EncodingError};
use thiserror::Error;

mod config;
mod run;

#[derive(Parser)]
#[command(version, about = "Grid-based stable fluids in two dimensions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a scenario without a window and record every frame.
    Run {
        /// Scenario file, defaults are used when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of frames to record, overriding the scenario.
        #[arg(short, long)]
        frames: Option<u64>,
        /// Directory to create for the recording.
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Play back a recording.
    View {
        path: PathBuf,
    },
    /// Run a scenario interactively.
    Live {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Decoding(#[from] DecodingError),
    #[error(transparent)]
    Template(#[from] indicatif::style::TemplateError),
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run { config, frames, output } => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

            let config = Config::load(config.as_deref())?;
            let frames = frames.unwrap_or(config.run.frames);
            run::run(&config, frames, output)?;
        }
        Command::View { path } => {
            let data = FluidDataDecoder::new(path).decode_all()?;
            eddy_view::view(data);
        }
        Command::Live { config } => {
            let config = Config::load(config.as_deref())?;
            eddy_view::live(config.build_scene(), config.run.fps, config.stirring());
        }
    }

    Ok(())
}
