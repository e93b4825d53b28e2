//! Ballpit Services Layer
//!
//! Settings loading and validation for the runtime.

pub mod settings;

pub use settings::{RenderMode, Settings, SettingsError};

use std::path::Path;

/// Settings from `path`, or the defaults when no path is given.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, SettingsError> {
    match path {
        Some(path) => {
            tracing::info!("Loading settings from {}", path.display());
            Settings::load(path)
        }
        None => {
            tracing::info!("No settings file given, using defaults");
            Ok(Settings::default())
        }
    }
}
