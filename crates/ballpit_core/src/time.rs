//! Real-time pacing
//!
//! The physics step is not fixed: it tracks the measured wall-clock cost of
//! a physics update, smoothed exponentially. Rendering and resorting are
//! amortized to the animation period no matter how fast physics iterates.

use std::time::Duration;

/// Starting estimate of one physics update (100 Hz).
pub const DEFAULT_PHYSICS_STEP: f64 = 1.0 / 100.0;
/// Target animation period (30 FPS).
pub const DEFAULT_ANIM_STEP: f64 = 1.0 / 30.0;
/// Weight kept by the previous estimate on every update.
pub const SMOOTHING: f64 = 0.9;

/// Emitted when an animation period has elapsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Physics iterations since the previous frame.
    pub frames: u64,
    /// Wall-clock time those iterations took, in seconds.
    pub elapsed: f64,
}

impl FrameReport {
    /// Simulation frames per second over the period.
    pub fn sim_fps(&self) -> f64 {
        self.frames as f64 / self.elapsed
    }
}

/// Step-size estimator and frame throttle.
#[derive(Debug, Clone)]
pub struct StepController {
    physics_step: f64,
    anim_step: f64,
    total_time: f64,
    frame_count: u64,
}

impl StepController {
    pub fn new(initial_physics_step: f64, anim_step: f64) -> Self {
        Self {
            physics_step: initial_physics_step,
            anim_step,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Current smoothed estimate, in seconds.
    pub fn physics_step(&self) -> f64 {
        self.physics_step
    }

    pub fn anim_step(&self) -> f64 {
        self.anim_step
    }

    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Fold one measured physics interval in. Returns a report and resets the
    /// accumulators once more than `anim_step` has accumulated.
    pub fn record(&mut self, interval: Duration) -> Option<FrameReport> {
        let t = interval.as_secs_f64();
        self.physics_step = SMOOTHING * self.physics_step + (1.0 - SMOOTHING) * t;
        self.total_time += t;
        self.frame_count += 1;

        if self.total_time > self.anim_step {
            let report = FrameReport {
                frames: self.frame_count,
                elapsed: self.total_time,
            };
            self.total_time = 0.0;
            self.frame_count = 0;
            Some(report)
        } else {
            None
        }
    }
}

impl Default for StepController {
    fn default() -> Self {
        Self::new(DEFAULT_PHYSICS_STEP, DEFAULT_ANIM_STEP)
    }
}
