//! The simulation driver loop.
//!
//! Every iteration runs the physics engine once and feeds the measured
//! interval to the [`StepController`]. Once per animation period the driver
//! pushes a frame to the renderer and runs a locality pass. Iterations are
//! strictly sequential; the host stops the loop by not calling [`Driver::step`]
//! again.

use std::time::Duration;

use ballpit_metrics::{Counter, PhaseProfiler, RingBuffer, ScopedTimer};

use crate::collab::{PhysicsEngine, PhysicsState, Renderer};
use crate::error::DriverError;
use crate::grid::{GridIndex, EMPTY};
use crate::particles::ParticleSet;
use crate::sort;
use crate::time::{FrameReport, StepController, DEFAULT_ANIM_STEP, DEFAULT_PHYSICS_STEP};

pub const DEFAULT_PARTICLE_COUNT: usize = 10_000;
pub const DEFAULT_RADIUS: f32 = 0.002;

/// Number of sim-fps reports kept for the rolling average.
const FPS_HISTORY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverConfig {
    pub radius: f32,
    /// Seed for the smoothed step estimate, in seconds.
    pub initial_physics_step: f64,
    /// Target animation period, in seconds.
    pub anim_step: f64,
}

impl DriverConfig {
    pub fn validate(&self) -> Result<(), DriverError> {
        if !(self.radius > 0.0 && self.radius < 0.5) {
            return Err(DriverError::InvalidRadius { radius: self.radius });
        }
        if !(self.anim_step.is_finite() && self.anim_step >= 0.0) {
            return Err(DriverError::InvalidAnimStep {
                anim_step: self.anim_step,
            });
        }
        if !(self.initial_physics_step.is_finite() && self.initial_physics_step >= 0.0) {
            return Err(DriverError::InvalidPhysicsStep {
                step: self.initial_physics_step,
            });
        }
        Ok(())
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            initial_physics_step: DEFAULT_PHYSICS_STEP,
            anim_step: DEFAULT_ANIM_STEP,
        }
    }
}

/// What one iteration did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Measured duration of the physics update.
    pub interval: Duration,
    /// Smoothed step estimate after folding `interval` in.
    pub physics_step: f64,
    /// Present when this iteration rendered and resorted.
    pub frame: Option<FrameReport>,
}

/// Totals for a bounded run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub iterations: u64,
    pub frames: u64,
    pub physics_step: f64,
}

pub struct Driver<P: PhysicsEngine, R: Renderer> {
    config: DriverConfig,
    particles: ParticleSet,
    grid: GridIndex,
    controller: StepController,
    engine: P,
    handle: P::Handle,
    renderer: R,
    iterations: u64,
    profiler: PhaseProfiler,
    counter: Counter,
    fps_history: RingBuffer,
}

impl<P: PhysicsEngine, R: Renderer> Driver<P, R> {
    /// Build the grid, preallocate engine resources and initialize the
    /// renderer. Both collaborators are set up exactly once here.
    pub fn new(
        config: DriverConfig,
        particles: ParticleSet,
        mut engine: P,
        mut renderer: R,
    ) -> Result<Self, DriverError> {
        config.validate()?;
        if particles.len() >= EMPTY as usize {
            return Err(DriverError::TooManyParticles {
                count: particles.len(),
            });
        }

        let mut grid = GridIndex::for_radius(config.radius);
        grid.rebuild(particles.positions());

        let handle = engine
            .preallocate(particles.len())
            .map_err(DriverError::physics)?;
        renderer
            .initialize(particles.positions(), 2.0 * config.radius)
            .map_err(DriverError::render)?;

        tracing::info!(
            particles = particles.len(),
            grid_size = grid.size(),
            occupied = grid.occupied(),
            "driver ready"
        );

        Ok(Self {
            config,
            particles,
            grid,
            controller: StepController::new(config.initial_physics_step, config.anim_step),
            engine,
            handle,
            renderer,
            iterations: 0,
            profiler: PhaseProfiler::new(),
            counter: Counter::new(),
            fps_history: RingBuffer::new(FPS_HISTORY),
        })
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    pub fn grid(&self) -> &GridIndex {
        &self.grid
    }

    pub fn controller(&self) -> &StepController {
        &self.controller
    }

    pub fn engine(&self) -> &P {
        &self.engine
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Completed iterations.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Run one iteration to completion.
    pub fn step(&mut self) -> Result<StepOutcome, DriverError> {
        let step = self.controller.physics_step() as f32;
        let grid_size = self.grid.size();
        let (positions, velocities) = self.particles.split_mut();
        let state = PhysicsState {
            positions,
            velocities,
            grid: &mut self.grid,
            radius: self.config.radius,
            grid_size,
        };

        let engine = &mut self.engine;
        let handle = &mut self.handle;
        let (result, interval) = ScopedTimer::measure(|| engine.update(state, handle, step));
        result.map_err(DriverError::physics)?;

        self.iterations += 1;
        self.profiler.record("physics", interval);
        let frame = self.controller.record(interval);
        tracing::trace!(
            iteration = self.iterations,
            interval_us = interval.as_micros() as u64,
            physics_step = self.controller.physics_step(),
            "physics update"
        );

        if let Some(report) = frame {
            self.present(report)?;
        }

        Ok(StepOutcome {
            interval,
            physics_step: self.controller.physics_step(),
            frame,
        })
    }

    /// Render the current positions, report throughput and restore locality.
    fn present(&mut self, report: FrameReport) -> Result<(), DriverError> {
        let positions = self.particles.positions();
        let renderer = &mut self.renderer;
        self.profiler
            .time_phase("render", || renderer.update(positions))
            .map_err(DriverError::render)?;
        self.counter.increment("frames_rendered");

        let sim_fps = report.sim_fps();
        tracing::info!("{:.1} simulation frames per second", sim_fps);
        self.fps_history.push(sim_fps);

        let particles = &mut self.particles;
        let grid = &mut self.grid;
        self.profiler
            .time_phase("resort", || sort::resort(particles, grid));
        self.counter.increment("resort_passes");
        tracing::debug!(occupied = self.grid.occupied(), "locality pass complete");
        Ok(())
    }

    /// Loop until a collaborator fails.
    pub fn run(&mut self) -> Result<(), DriverError> {
        loop {
            self.step()?;
        }
    }

    /// Run `iterations` iterations, or fewer if a collaborator fails.
    pub fn run_for(&mut self, iterations: u64) -> Result<RunSummary, DriverError> {
        let mut frames = 0;
        for _ in 0..iterations {
            if self.step()?.frame.is_some() {
                frames += 1;
            }
        }
        Ok(RunSummary {
            iterations,
            frames,
            physics_step: self.controller.physics_step(),
        })
    }

    /// Log accumulated instrumentation. Silent without the `metrics` feature.
    pub fn log_metrics(&self) {
        for (phase, timing) in self.profiler.iter() {
            tracing::info!(
                phase,
                calls = timing.calls,
                mean_us = timing.mean().as_micros() as u64,
                "phase timing"
            );
        }
        for (name, count) in self.counter.iter() {
            tracing::info!(name, count, "counter");
        }
        if !self.fps_history.is_empty() {
            let (lo, hi) = self.fps_history.min_max();
            tracing::info!(
                mean = self.fps_history.average(),
                min = lo,
                max = hi,
                "recent simulation frames per second"
            );
        }
    }

    pub fn into_particles(self) -> ParticleSet {
        self.particles
    }
}
