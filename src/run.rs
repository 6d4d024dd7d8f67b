use std::path::PathBuf;

use eddy_fluids::diagnostics::FluidStats;
use eddy_io::encode::FluidDataEncoder;
use indicatif::{ProgressBar, ProgressIterator, ProgressStyle};

use crate::{config::Config, CliError};

/// Runs the scenario headless for `frames` frames, recording every frame into `output`.
pub fn run(config: &Config, frames: u64, output: PathBuf) -> Result<FluidStats, CliError> {
    let mut scene = config.build_scene();
    let mut encoder = FluidDataEncoder::new(output, frames, config.run.fps)?;

    encoder.encode_metadata(&scene)?;

    let bar_template = "Running Simulation {spinner:.green} [{elapsed}] [{bar:50.white/white}] {pos}/{len} ({eta})";
    let style = ProgressStyle::with_template(bar_template)?
        .progress_chars("=> ").tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let progress = ProgressBar::new(frames).with_style(style);

    for _ in (0..frames).progress_with(progress) {
        scene.step();
        encoder.encode_frame(&scene)?;
    }

    let stats = scene.fluid.stats();

    log::info!(
        "finished {} ticks: total density {:.4}, kinetic energy {:.4e}, max divergence {:.4e}",
        stats.ticks,
        stats.total_density,
        stats.kinetic_energy,
        stats.max_divergence,
    );

    if !stats.finite {
        log::warn!("the simulation produced non-finite values, try a smaller dt");
    }

    Ok(stats)
}
