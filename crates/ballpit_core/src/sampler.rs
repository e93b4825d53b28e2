//! Initial particle state by rejection sampling.
//!
//! Positions are uniform over `[r, 1 - r)²` minus a disk around the domain
//! center; velocities are uniform over `[-v, v]²`.

use crate::math::{Vec2, DOMAIN_CENTER};
use crate::particles::ParticleSet;
use rand::Rng;
use thiserror::Error;

/// Radius of the empty disk carved out of the middle of the domain.
pub const DEFAULT_EXCLUSION_RADIUS: f32 = 0.25;
/// Per-axis bound on initial velocity components.
pub const DEFAULT_VELOCITY_LIMIT: f32 = 0.25;

#[derive(Debug, Error, PartialEq)]
pub enum SamplerError {
    #[error("particle radius {radius} must be in (0, 0.5)")]
    InvalidRadius { radius: f32 },

    #[error("exclusion radius {radius} must be finite and non-negative")]
    InvalidExclusion { radius: f32 },

    #[error("exclusion disk of radius {exclusion} covers the whole domain for particle radius {radius}")]
    DomainCovered { exclusion: f32, radius: f32 },

    #[error("velocity limit {limit} must be finite and non-negative")]
    InvalidVelocityLimit { limit: f32 },
}

/// Positions together with how many redraw rounds rejection needed.
#[derive(Debug, Clone)]
pub struct RejectionOutcome {
    pub positions: Vec<Vec2>,
    pub redraw_rounds: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct Sampler {
    radius: f32,
    exclusion_radius: f32,
    velocity_limit: f32,
}

impl Sampler {
    /// Sampler with the default exclusion disk and velocity range.
    pub fn new(radius: f32) -> Result<Self, SamplerError> {
        Self::with_params(radius, DEFAULT_EXCLUSION_RADIUS, DEFAULT_VELOCITY_LIMIT)
    }

    /// An exclusion radius of zero disables the hole.
    pub fn with_params(
        radius: f32,
        exclusion_radius: f32,
        velocity_limit: f32,
    ) -> Result<Self, SamplerError> {
        if !(radius > 0.0 && radius < 0.5) {
            return Err(SamplerError::InvalidRadius { radius });
        }
        if !(exclusion_radius.is_finite() && exclusion_radius >= 0.0) {
            return Err(SamplerError::InvalidExclusion {
                radius: exclusion_radius,
            });
        }
        // The domain corners are the points farthest from the center.
        if exclusion_radius >= std::f32::consts::SQRT_2 * (0.5 - radius) {
            return Err(SamplerError::DomainCovered {
                exclusion: exclusion_radius,
                radius,
            });
        }
        if !(velocity_limit.is_finite() && velocity_limit >= 0.0) {
            return Err(SamplerError::InvalidVelocityLimit {
                limit: velocity_limit,
            });
        }
        Ok(Self {
            radius,
            exclusion_radius,
            velocity_limit,
        })
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn exclusion_radius(&self) -> f32 {
        self.exclusion_radius
    }

    fn draw_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let lo = self.radius;
        let hi = 1.0 - self.radius;
        Vec2::new(rng.gen_range(lo..hi), rng.gen_range(lo..hi))
    }

    fn excluded(&self, p: Vec2) -> bool {
        p.distance(DOMAIN_CENTER) < self.exclusion_radius
    }

    /// Draw `count` positions, redrawing exactly the rejected ones until none
    /// fall inside the exclusion disk. There is no retry cap.
    pub fn sample_positions<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> RejectionOutcome {
        let mut positions: Vec<Vec2> = (0..count).map(|_| self.draw_position(rng)).collect();
        let mut redraw_rounds = 0;

        loop {
            let rejected: Vec<usize> = positions
                .iter()
                .enumerate()
                .filter(|(_, &p)| self.excluded(p))
                .map(|(i, _)| i)
                .collect();
            if rejected.is_empty() {
                break;
            }
            tracing::trace!(round = redraw_rounds, rejected = rejected.len(), "redrawing");
            for i in rejected {
                positions[i] = self.draw_position(rng);
            }
            redraw_rounds += 1;
        }

        RejectionOutcome {
            positions,
            redraw_rounds,
        }
    }

    pub fn sample_velocities<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Vec2> {
        let v = self.velocity_limit;
        (0..count)
            .map(|_| Vec2::new(rng.gen_range(-v..=v), rng.gen_range(-v..=v)))
            .collect()
    }

    /// Full initial particle set.
    pub fn sample<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> ParticleSet {
        let outcome = self.sample_positions(count, rng);
        tracing::debug!(
            count,
            redraw_rounds = outcome.redraw_rounds,
            "sampled initial positions"
        );
        let velocities = self.sample_velocities(count, rng);
        ParticleSet::paired(outcome.positions, velocities)
    }
}
