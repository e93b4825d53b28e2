//! Reference physics engine: ballistic motion with elastic ball collisions.
//!
//! Candidates come from the broad-phase grid in a ±3 cell window: touching
//! centers are `2r = 2√2` cell spacings apart at most. The grid is
//! patched as balls move so later lookups in the same step stay current.

use ballpit_core::glam::Vec2;
use ballpit_core::{PhysicsEngine, PhysicsState};
use thiserror::Error;

/// Cells searched on each side of a ball's own cell.
const REACH: u32 = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("scratch sized for {expected} particles, got {actual}")]
    HandleMismatch { expected: usize, actual: usize },
}

/// Preallocated candidate buffer, sized once for the particle count.
pub struct CollisionScratch {
    particles: usize,
    candidates: Vec<u32>,
}

#[derive(Debug, Default)]
pub struct BallisticEngine;

impl BallisticEngine {
    pub fn new() -> Self {
        Self
    }
}

/// Equal-mass elastic response along the line of centers, applied only while
/// the pair is approaching so overlapping balls separate instead of sticking.
fn collide(positions: &[Vec2], velocities: &mut [Vec2], i: usize, j: usize) {
    let Some(normal) = (positions[j] - positions[i]).try_normalize() else {
        return;
    };
    let approach = (velocities[i] - velocities[j]).dot(normal);
    if approach > 0.0 {
        velocities[i] -= approach * normal;
        velocities[j] += approach * normal;
    }
}

/// Keep a ball inside `[radius, 1 - radius]`, reflecting the velocity.
fn reflect_walls(p: &mut Vec2, v: &mut Vec2, radius: f32) {
    let (lo, hi) = (radius, 1.0 - radius);
    if p.x < lo {
        p.x = lo;
        v.x = v.x.abs();
    } else if p.x > hi {
        p.x = hi;
        v.x = -v.x.abs();
    }
    if p.y < lo {
        p.y = lo;
        v.y = v.y.abs();
    } else if p.y > hi {
        p.y = hi;
        v.y = -v.y.abs();
    }
}

impl PhysicsEngine for BallisticEngine {
    type Handle = CollisionScratch;
    type Error = EngineError;

    fn preallocate(&mut self, count: usize) -> Result<CollisionScratch, EngineError> {
        let window = (2 * REACH + 1) as usize;
        Ok(CollisionScratch {
            particles: count,
            candidates: Vec::with_capacity(window * window),
        })
    }

    fn update(
        &mut self,
        state: PhysicsState<'_>,
        scratch: &mut CollisionScratch,
        step: f32,
    ) -> Result<(), EngineError> {
        let PhysicsState {
            positions,
            velocities,
            grid,
            radius,
            ..
        } = state;
        if scratch.particles != positions.len() {
            return Err(EngineError::HandleMismatch {
                expected: scratch.particles,
                actual: positions.len(),
            });
        }

        let contact_sq = (2.0 * radius) * (2.0 * radius);
        for i in 0..positions.len() {
            let cell = grid.clamped_cell_of(positions[i]);
            scratch.candidates.clear();
            scratch
                .candidates
                .extend(grid.neighbors(cell, REACH).filter(|&j| j as usize > i));
            for &j in &scratch.candidates {
                let j = j as usize;
                if positions[i].distance_squared(positions[j]) < contact_sq {
                    collide(positions, velocities, i, j);
                }
            }
        }

        for i in 0..positions.len() {
            let old_cell = grid.cell_of(positions[i]);
            let mut p = positions[i] + velocities[i] * step;
            reflect_walls(&mut p, &mut velocities[i], radius);
            positions[i] = p;

            if let Some(cell) = old_cell {
                if grid.get(cell) == Some(i as u32) {
                    grid.clear_cell(cell);
                }
            }
            if let Some(cell) = grid.cell_of(p) {
                grid.set(cell, i as u32);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballpit_core::GridIndex;

    const RADIUS: f32 = 0.01;

    fn run_step(positions: &mut [Vec2], velocities: &mut [Vec2], grid: &mut GridIndex, step: f32) {
        let mut engine = BallisticEngine::new();
        let mut scratch = engine.preallocate(positions.len()).unwrap();
        let grid_size = grid.size();
        engine
            .update(
                PhysicsState {
                    positions,
                    velocities,
                    grid,
                    radius: RADIUS,
                    grid_size,
                },
                &mut scratch,
                step,
            )
            .unwrap();
    }

    #[test]
    fn test_free_flight() {
        let mut positions = vec![Vec2::new(0.5, 0.5)];
        let mut velocities = vec![Vec2::new(0.1, -0.2)];
        let mut grid = GridIndex::for_radius(RADIUS);
        grid.rebuild(&positions);

        run_step(&mut positions, &mut velocities, &mut grid, 0.5);

        assert!((positions[0] - Vec2::new(0.55, 0.4)).length() < 1e-6);
        assert_eq!(velocities[0], Vec2::new(0.1, -0.2));
        assert_eq!(grid.get(grid.cell_of(positions[0]).unwrap()), Some(0));
        assert_eq!(grid.occupied(), 1);
    }

    #[test]
    fn test_wall_reflection() {
        let mut positions = vec![Vec2::new(0.995, 0.02)];
        let mut velocities = vec![Vec2::new(0.2, -0.2)];
        let mut grid = GridIndex::for_radius(RADIUS);
        grid.rebuild(&positions);

        run_step(&mut positions, &mut velocities, &mut grid, 0.1);

        assert_eq!(positions[0], Vec2::new(1.0 - RADIUS, RADIUS));
        assert_eq!(velocities[0], Vec2::new(-0.2, 0.2));
    }

    #[test]
    fn test_head_on_collision_swaps_velocities() {
        let mut positions = vec![Vec2::new(0.5, 0.5), Vec2::new(0.515, 0.5)];
        let mut velocities = vec![Vec2::new(0.1, 0.0), Vec2::new(-0.1, 0.0)];
        let mut grid = GridIndex::for_radius(RADIUS);
        grid.rebuild(&positions);

        run_step(&mut positions, &mut velocities, &mut grid, 0.0);

        assert!((velocities[0] - Vec2::new(-0.1, 0.0)).length() < 1e-6);
        assert!((velocities[1] - Vec2::new(0.1, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_separating_pair_is_left_alone() {
        let mut positions = vec![Vec2::new(0.5, 0.5), Vec2::new(0.515, 0.5)];
        let mut velocities = vec![Vec2::new(-0.1, 0.0), Vec2::new(0.1, 0.0)];
        let mut grid = GridIndex::for_radius(RADIUS);
        grid.rebuild(&positions);

        run_step(&mut positions, &mut velocities, &mut grid, 0.0);

        assert_eq!(velocities, vec![Vec2::new(-0.1, 0.0), Vec2::new(0.1, 0.0)]);
    }

    #[test]
    fn test_handle_mismatch_is_an_error() {
        let mut engine = BallisticEngine::new();
        let mut scratch = engine.preallocate(3).unwrap();
        let mut positions = vec![Vec2::splat(0.5)];
        let mut velocities = vec![Vec2::ZERO];
        let mut grid = GridIndex::for_radius(RADIUS);
        let grid_size = grid.size();

        let err = engine
            .update(
                PhysicsState {
                    positions: &mut positions,
                    velocities: &mut velocities,
                    grid: &mut grid,
                    radius: RADIUS,
                    grid_size,
                },
                &mut scratch,
                0.01,
            )
            .unwrap_err();
        assert_eq!(err, EngineError::HandleMismatch { expected: 3, actual: 1 });
    }
}
