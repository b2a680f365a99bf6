//! Simulation settings
//!
//! Loaded from a JSON file; any missing field takes its default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts;
use crate::sim::ExecutionPolicy;

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
    /// Indicates an invalid configuration value.
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// World and scheduling configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Canvas ===
    pub canvas_width: f32,
    pub canvas_height: f32,

    // === Cadence ===
    /// Update tick interval (milliseconds)
    pub update_interval_ms: u64,
    /// Paint tick interval (milliseconds)
    pub paint_interval_ms: u64,
    /// Catch-up cap per driver advance
    pub max_substeps: u32,

    // === Spawning ===
    pub min_radius: f32,
    pub max_radius: f32,
    /// Per-axis speed bounds
    pub min_speed: f32,
    pub max_speed: f32,

    // === Engine ===
    /// Fixed seed for reproducible runs; None draws from OS entropy
    pub seed: Option<u64>,
    pub policy: ExecutionPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: consts::CANVAS_WIDTH,
            canvas_height: consts::CANVAS_HEIGHT,

            update_interval_ms: consts::UPDATE_INTERVAL_MS,
            paint_interval_ms: consts::PAINT_INTERVAL_MS,
            max_substeps: consts::MAX_SUBSTEPS,

            min_radius: consts::MIN_RADIUS,
            max_radius: consts::MAX_RADIUS,
            min_speed: consts::MIN_SPEED,
            max_speed: consts::MAX_SPEED,

            seed: None,
            policy: ExecutionPolicy::Sequential,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.canvas_width) || !positive(self.canvas_height) {
            return Err(SettingsError::Invalid("canvas dimensions must be positive"));
        }
        if self.update_interval_ms == 0 || self.paint_interval_ms == 0 {
            return Err(SettingsError::Invalid("tick intervals must be non-zero"));
        }
        if self.max_substeps == 0 {
            return Err(SettingsError::Invalid("max_substeps must be non-zero"));
        }
        if !positive(self.min_radius) || self.min_radius > self.max_radius {
            return Err(SettingsError::Invalid("radius range must be positive with min <= max"));
        }
        if !(self.min_speed.is_finite() && self.min_speed >= 0.0) || self.min_speed > self.max_speed {
            return Err(SettingsError::Invalid("speed range must be non-negative with min <= max"));
        }
        if !self.max_speed.is_finite() || !self.max_radius.is_finite() {
            return Err(SettingsError::Invalid("spawn ranges must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.update_interval_ms, 30);
        assert_eq!(settings.paint_interval_ms, 40);
        assert_eq!(settings.policy, ExecutionPolicy::Sequential);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 42, "policy": "parallel" }"#).unwrap();
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.policy, ExecutionPolicy::Parallel);
        assert_eq!(settings.canvas_width, consts::CANVAS_WIDTH);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            seed: Some(7),
            canvas_width: 320.0,
            ..Settings::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = Settings::from_json(r#"{ "min_radius": 20.0, "max_radius": 10.0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
        let err = Settings::from_json(r#"{ "update_interval_ms": 0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
        let err = Settings::from_json(r#"{ "canvas_width": -1.0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = Path::new("/nonexistent/boid-world/settings.json");
        assert!(matches!(Settings::load_from(path), Err(SettingsError::Io(_))));
        assert_eq!(Settings::load_or_default(Some(path)), Settings::default());
    }
}
