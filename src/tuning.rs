//! Missile tuning
//!
//! Everything a designer can tweak per missile prefab. Loaded from JSON;
//! missing keys fall back to [`MissileTuning::default`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::AudioClip;
use crate::consts::{SMOKE_JITTER_MAX, SMOKE_JITTER_MIN};
use crate::sim::particles::ParticleTemplate;

/// Tuning loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TuningError {
    /// File I/O error
    #[error("Failed to read tuning: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error
    #[error("Failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    /// Validation error
    #[error("Tuning validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// Per-spawn missile configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissileTuning {
    // === Timing ===
    /// Seconds before the missile destroys itself
    pub lifetime_secs: f32,
    /// Seconds of slow flight before the boost
    pub acceleration_delay_secs: f32,
    /// Fraction of launch speed flown before the boost, in (0, 1]
    pub start_speed_fraction: f32,
    /// Base seconds between smoke puffs
    pub smoke_base_interval: f32,
    /// Extra random seconds added to each smoke interval
    pub smoke_jitter_min: f32,
    pub smoke_jitter_max: f32,

    // === Audio ===
    pub standard_impact_clips: Vec<AudioClip>,
    /// Not played by the impact sequence yet
    pub asteroid_impact_clips: Vec<AudioClip>,

    // === Visual Effects ===
    pub flight_particles: Option<ParticleTemplate>,
    pub collision_particles: Option<ParticleTemplate>,
}

impl Default for MissileTuning {
    fn default() -> Self {
        Self {
            lifetime_secs: 5.0,
            acceleration_delay_secs: 0.5,
            start_speed_fraction: 0.1,
            smoke_base_interval: 0.1,
            smoke_jitter_min: SMOKE_JITTER_MIN,
            smoke_jitter_max: SMOKE_JITTER_MAX,

            standard_impact_clips: Vec::new(),
            asteroid_impact_clips: Vec::new(),

            flight_particles: None,
            collision_particles: None,
        }
    }
}

impl MissileTuning {
    /// Parse and validate tuning from a JSON string
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read, parse and validate a tuning file
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load a tuning file, falling back to defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded missile tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("{e}; using default missile tuning");
                Self::default()
            }
        }
    }

    /// Check the invariants the missile relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        let mut errors = Vec::new();

        let fraction = self.start_speed_fraction;
        if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
            errors.push(format!("start_speed_fraction must be in (0, 1], got {fraction}"));
        }

        for (name, value) in [
            ("lifetime_secs", self.lifetime_secs),
            ("acceleration_delay_secs", self.acceleration_delay_secs),
            ("smoke_base_interval", self.smoke_base_interval),
            ("smoke_jitter_min", self.smoke_jitter_min),
            ("smoke_jitter_max", self.smoke_jitter_max),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("{name} must be a non-negative number, got {value}"));
            }
        }

        if self.smoke_jitter_min > self.smoke_jitter_max {
            errors.push(format!(
                "smoke_jitter_min ({}) exceeds smoke_jitter_max ({})",
                self.smoke_jitter_min, self.smoke_jitter_max
            ));
        }

        for template in [&self.flight_particles, &self.collision_particles]
            .into_iter()
            .flatten()
        {
            if !template.lifetime_secs.is_finite() || template.lifetime_secs <= 0.0 {
                errors.push(format!(
                    "particle template '{}' needs a positive lifetime",
                    template.name
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(TuningError::Validation(errors))
        }
    }
}
