//! Ballpit Runtime
//!
//! Loads settings, samples the initial state and drives the simulation.
//! Usage: `ballpit [settings.json]`

mod physics;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use ballpit_core::math::simulation_rng;
use ballpit_core::{Driver, VERSION};
use ballpit_services::{load_settings, RenderMode};

use crate::physics::BallisticEngine;
use crate::render::{FrameSink, LogRenderer, TerminalRenderer};

fn main() -> Result<()> {
    // Logs go to stderr so the terminal renderer owns stdout
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    tracing::info!("Ballpit v{}", VERSION);

    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = load_settings(path.as_deref()).context("loading settings")?;

    let seed = settings.sampling.seed;
    let mut rng = simulation_rng(seed);
    let particles = settings
        .sampler()?
        .sample(settings.particles.count, &mut rng);

    let renderer = match settings.render.mode {
        RenderMode::Log => FrameSink::Log(LogRenderer::new()),
        RenderMode::Terminal => FrameSink::Terminal(TerminalRenderer::new(
            std::io::stdout(),
            settings.render.columns,
            settings.render.rows,
            seed,
        )),
    };

    let mut driver = Driver::new(
        settings.driver_config(),
        particles,
        BallisticEngine::new(),
        renderer,
    )?;

    match settings.run.max_iterations {
        Some(iterations) => {
            let summary = driver.run_for(iterations)?;
            tracing::info!(
                iterations = summary.iterations,
                frames = summary.frames,
                physics_step = summary.physics_step,
                "run complete"
            );
        }
        None => driver.run()?,
    }

    if let FrameSink::Log(log) = driver.renderer() {
        tracing::info!(frames = log.frames(), "frames summarized");
    }
    driver.log_metrics();
    Ok(())
}
