//! Ballpit Core
//!
//! The simulation driver for a 2-D ball pit:
//! - Rejection-sampled initial state
//! - Uniform broad-phase grid index
//! - Z-order locality passes
//! - Real-time step estimation and frame throttling
//!
//! Physics and rendering are supplied by the host through the
//! [`PhysicsEngine`] and [`Renderer`] traits.

pub mod collab;
pub mod driver;
pub mod error;
pub mod grid;
pub mod math;
pub mod morton;
pub mod particles;
pub mod sampler;
pub mod sort;
pub mod time;

pub use glam;

pub use collab::{PhysicsEngine, PhysicsState, Renderer};
pub use driver::{Driver, DriverConfig, RunSummary, StepOutcome};
pub use error::DriverError;
pub use grid::{CellCoord, GridIndex};
pub use particles::ParticleSet;
pub use sampler::{Sampler, SamplerError};
pub use time::{FrameReport, StepController};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
