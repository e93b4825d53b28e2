use thiserror::Error;

type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that stop the driver. Collaborator failures are never retried.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("particle radius {radius} must be in (0, 0.5)")]
    InvalidRadius { radius: f32 },

    #[error("animation period {anim_step}s must be finite and non-negative")]
    InvalidAnimStep { anim_step: f64 },

    #[error("initial physics step {step}s must be finite and non-negative")]
    InvalidPhysicsStep { step: f64 },

    #[error("particle count {count} exceeds the grid's slot range")]
    TooManyParticles { count: usize },

    #[error("physics engine failed")]
    Physics(#[source] BoxedError),

    #[error("renderer failed")]
    Render(#[source] BoxedError),
}

impl DriverError {
    pub(crate) fn physics<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Physics(Box::new(err))
    }

    pub(crate) fn render<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Render(Box::new(err))
    }
}
