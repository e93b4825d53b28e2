//! Locality pass: reorder particles along the Z-order curve.
//!
//! Particles drift away from their memory neighbors as they move, which hurts
//! the physics engine's cache behavior when it scans neighbor cells. Sorting
//! slots by the Morton order of their grid cells restores locality.

use crate::grid::{CellCoord, GridIndex};
use crate::math::Vec2;
use crate::morton::morton_cmp;
use crate::particles::ParticleSet;
use rayon::prelude::*;

/// Slot order that places particles along the Z-order curve: entry `k` is
/// the current slot of the particle that should move to slot `k`.
///
/// Colocated particles keep their relative order.
pub fn morton_order(positions: &[Vec2], grid: &GridIndex) -> Vec<u32> {
    let mut keyed: Vec<(u32, CellCoord)> = positions
        .par_iter()
        .enumerate()
        .map(|(i, &p)| (i as u32, grid.clamped_cell_of(p)))
        .collect();

    // par_sort_by is stable
    keyed.par_sort_by(|a, b| morton_cmp(a.1, b.1));
    keyed.into_iter().map(|(i, _)| i).collect()
}

/// Reorder `particles` along the Z-order curve and rebuild `grid` from
/// scratch, since every cell → slot entry is invalidated by the move.
///
/// Returns the applied order.
pub fn resort(particles: &mut ParticleSet, grid: &mut GridIndex) -> Vec<u32> {
    let order = morton_order(particles.positions(), grid);
    particles.permute(&order);
    grid.rebuild(particles.positions());
    order
}
