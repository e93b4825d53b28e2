//! Contracts for the collaborators the driver sequences.
//!
//! Neither trait prescribes a physics model or a rendering technology.

use crate::grid::GridIndex;
use crate::math::Vec2;

/// Simulation state lent to the physics engine for one update.
///
/// The driver hands out exclusive borrows and regains ownership when
/// `update` returns; the grid may be stale relative to the new positions.
pub struct PhysicsState<'a> {
    pub positions: &'a mut [Vec2],
    pub velocities: &'a mut [Vec2],
    pub grid: &'a mut GridIndex,
    pub radius: f32,
    pub grid_size: usize,
}

/// Advances particles by one step. `update` is blocking: nothing may still be
/// running in the background when it returns.
pub trait PhysicsEngine {
    /// Engine-owned resource sized for the particle count, e.g. per-particle
    /// locks or scratch space. Opaque to the driver.
    type Handle;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Called once at startup.
    fn preallocate(&mut self, count: usize) -> Result<Self::Handle, Self::Error>;

    /// Advance by `step` seconds in place.
    fn update(
        &mut self,
        state: PhysicsState<'_>,
        handle: &mut Self::Handle,
        step: f32,
    ) -> Result<(), Self::Error>;
}

/// Displays particle positions.
pub trait Renderer {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Called once before the first frame.
    fn initialize(&mut self, positions: &[Vec2], diameter: f32) -> Result<(), Self::Error>;

    /// Redraw from a snapshot; the driver does not wait for acknowledgment.
    fn update(&mut self, positions: &[Vec2]) -> Result<(), Self::Error>;
}
