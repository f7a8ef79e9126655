use std::path::PathBuf;

use glam::{UVec2, Vec2};
use indicatif::{ProgressBar, ProgressIterator, ProgressStyle};
use log::{info, warn};

use swirl_fluids::{
    diagnostics::{interior_divergence, is_finite, kinetic_energy, l2_norm, max, total},
    scene::Scene,
    source::Source,
    stable::{StableFluid2D, StableFluid2DParams},
};
use swirl_io::{decode::FluidDataDecoder, encode::FluidDataEncoder};

use crate::{config::Config, CliError};

/// Steps a scene built from `config`, recording every frame into `output` when given.
pub fn run(config: &Config, output: Option<PathBuf>) -> Result<(), CliError> {
    let physics = &config.physics;
    let frames = config.run.frames;

    let fluid = StableFluid2D::new(physics.size, physics.diffusion, physics.viscosity, physics.dt)?;
    let params = StableFluid2DParams { iterations: physics.iterations };
    let mut scene = Scene::new(fluid, params);

    for s in config.sources() {
        let source = Source::new(UVec2::new(s.x, s.y))
            .with_density(s.density)
            .with_velocity(Vec2::new(s.velocity_x, s.velocity_y))
            .with_spin(s.spin);
        scene.add_source(source)?;
    }

    info!(
        "running {frames} frames on a {n}x{n} grid with {} sources",
        scene.sources().len(),
        n = scene.size(),
    );

    let mut encoder = match output {
        Some(path) => {
            let mut encoder = FluidDataEncoder::new(path, frames, config.run.fps)?;
            encoder.encode_metadata(&scene)?;
            info!("recording to {}", encoder.path().display());
            Some(encoder)
        }
        None => None,
    };

    let bar_template = "Running Simulation {spinner:.green} [{elapsed}] [{bar:50.white/white}] {pos}/{len} ({eta})";
    let style = ProgressStyle::with_template(bar_template)?
        .progress_chars("=> ").tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let progress = ProgressBar::new(frames).with_style(style);

    for _frame in (0..frames).progress_with(progress) {
        scene.step()?;

        if let Some(encoder) = encoder.as_mut() {
            encoder.encode_frame(&scene)?;
        }
    }

    let fluid = &scene.fluid;
    if !is_finite(fluid.density()) || !is_finite(fluid.velocity_x()) || !is_finite(fluid.velocity_y()) {
        warn!("simulation produced non-finite values");
    }

    info!(
        "finished {} frames: total density {:.4}, kinetic energy {:.6}",
        scene.frame(),
        total(fluid.density()),
        kinetic_energy(fluid.velocity_x(), fluid.velocity_y()),
    );

    Ok(())
}

/// Logs per-frame diagnostics of a recording.
pub fn inspect(path: PathBuf) -> Result<(), CliError> {
    let mut decoder = FluidDataDecoder::new(path);
    let meta = decoder.decode_metadata()?;

    info!(
        "{n}x{n} grid, {} frames at {} fps, dt={} diffusion={} viscosity={}",
        meta.num_frames,
        meta.fps,
        meta.dt,
        meta.diffusion,
        meta.viscosity,
        n = meta.size,
    );

    let mut frame = 0;
    while let Some(data) = decoder.decode_frame()? {
        let div = interior_divergence(&data.velocity_x, &data.velocity_y);

        info!(
            "frame {frame}: total density {:.4}, max density {:.4}, kinetic energy {:.6}, divergence {:.6}",
            total(&data.density),
            max(&data.density),
            kinetic_energy(&data.velocity_x, &data.velocity_y),
            l2_norm(&div),
        );

        frame += 1;
    }

    Ok(())
}
