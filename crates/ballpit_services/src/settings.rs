//! Settings management

use std::path::{Path, PathBuf};

use ballpit_core::driver::{DEFAULT_PARTICLE_COUNT, DEFAULT_RADIUS};
use ballpit_core::sampler::{DEFAULT_EXCLUSION_RADIUS, DEFAULT_VELOCITY_LIMIT};
use ballpit_core::time::{DEFAULT_ANIM_STEP, DEFAULT_PHYSICS_STEP};
use ballpit_core::{DriverConfig, DriverError, Sampler, SamplerError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest radius accepted; the grid has about `2 / radius²` cells.
pub const MIN_RADIUS: f32 = 0.0005;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings")]
    Parse(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),

    #[error(transparent)]
    Sampler(#[from] SamplerError),

    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// Simulation settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub particles: ParticleSettings,
    pub sampling: SamplingSettings,
    pub timing: TimingSettings,
    pub render: RenderSettings,
    pub run: RunSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSettings {
    pub count: usize,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingSettings {
    /// Radius of the empty disk in the middle of the domain; 0 disables it.
    pub exclusion_radius: f32,
    pub velocity_limit: f32,
    /// Fixed seed for reproducible runs.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    pub initial_physics_step: f64,
    pub anim_step: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Per-frame summary in the log.
    Log,
    /// ANSI density map on stdout.
    Terminal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub mode: RenderMode,
    pub columns: u16,
    pub rows: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Stop after this many iterations; run until killed when unset.
    pub max_iterations: Option<u64>,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            count: DEFAULT_PARTICLE_COUNT,
            radius: DEFAULT_RADIUS,
        }
    }
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            exclusion_radius: DEFAULT_EXCLUSION_RADIUS,
            velocity_limit: DEFAULT_VELOCITY_LIMIT,
            seed: None,
        }
    }
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            initial_physics_step: DEFAULT_PHYSICS_STEP,
            anim_step: DEFAULT_ANIM_STEP,
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            mode: RenderMode::Log,
            columns: 80,
            rows: 40,
        }
    }
}

impl Settings {
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.particles.radius < MIN_RADIUS {
            return Err(SettingsError::Invalid(format!(
                "particle radius {} is below the minimum {}",
                self.particles.radius, MIN_RADIUS
            )));
        }
        if self.render.mode == RenderMode::Terminal
            && (self.render.columns == 0 || self.render.rows == 0)
        {
            return Err(SettingsError::Invalid(
                "terminal renderer needs at least one row and column".to_string(),
            ));
        }
        self.driver_config().validate()?;
        self.sampler()?;
        Ok(())
    }

    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            radius: self.particles.radius,
            initial_physics_step: self.timing.initial_physics_step,
            anim_step: self.timing.anim_step,
        }
    }

    pub fn sampler(&self) -> Result<Sampler, SamplerError> {
        Sampler::with_params(
            self.particles.radius,
            self.sampling.exclusion_radius,
            self.sampling.velocity_limit,
        )
    }
}
