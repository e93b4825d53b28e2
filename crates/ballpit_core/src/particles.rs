//! Parallel position/velocity arrays for a fixed-size particle set.

use crate::math::Vec2;
use rayon::prelude::*;

/// Positions and velocities of N particles.
///
/// Slot `i` in both arrays always describes the same particle. The slot is
/// not a stable identity: a locality pass moves particles to new slots.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSet {
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
}

impl ParticleSet {
    /// Pair up positions and velocities. Returns `None` when the lengths differ.
    pub fn new(positions: Vec<Vec2>, velocities: Vec<Vec2>) -> Option<Self> {
        (positions.len() == velocities.len()).then_some(Self {
            positions,
            velocities,
        })
    }

    /// Caller guarantees equal lengths.
    pub(crate) fn paired(positions: Vec<Vec2>, velocities: Vec<Vec2>) -> Self {
        debug_assert_eq!(positions.len(), velocities.len());
        Self {
            positions,
            velocities,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec2] {
        &self.velocities
    }

    /// Mutable views of both arrays at once.
    pub fn split_mut(&mut self) -> (&mut [Vec2], &mut [Vec2]) {
        (&mut self.positions, &mut self.velocities)
    }

    /// Gather both arrays through the same permutation: the particle in old
    /// slot `order[k]` moves to slot `k`.
    pub fn permute(&mut self, order: &[u32]) {
        debug_assert_eq!(order.len(), self.len());
        debug_assert!(is_permutation(order), "order is not a permutation");

        self.positions = order
            .par_iter()
            .map(|&old| self.positions[old as usize])
            .collect();
        self.velocities = order
            .par_iter()
            .map(|&old| self.velocities[old as usize])
            .collect();
    }

    pub fn into_parts(self) -> (Vec<Vec2>, Vec<Vec2>) {
        (self.positions, self.velocities)
    }
}

fn is_permutation(order: &[u32]) -> bool {
    let mut seen = vec![false; order.len()];
    order.iter().all(|&i| match seen.get_mut(i as usize) {
        Some(slot) if !*slot => {
            *slot = true;
            true
        }
        _ => false,
    })
}
