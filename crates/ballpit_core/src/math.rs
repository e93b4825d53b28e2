//! Math utilities
//!
//! Re-exports glam with the simulation domain constants and RNG setup

pub use glam::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Center of the unit-square simulation domain.
pub const DOMAIN_CENTER: Vec2 = Vec2::new(0.5, 0.5);

/// True when both coordinates lie in `[0, 1)`.
#[inline]
pub fn in_unit_domain(p: Vec2) -> bool {
    (0.0..1.0).contains(&p.x) && (0.0..1.0).contains(&p.y)
}

/// RNG for a run: reproducible when seeded, OS entropy otherwise.
pub fn simulation_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
