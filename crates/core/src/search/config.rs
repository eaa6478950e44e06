//! Search parameters

use crate::core_types::error::{Result, SmokeError};
use crate::core_types::units::GameUnits;
use crate::physics::linspace;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for the position search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Landing distance from the target above which a throw is discarded (units)
    pub max_accuracy: GameUnits,
    /// Half width of the square grid around the target (units)
    pub search_radius: GameUnits,
    /// Grid spacing (units)
    pub grid_step: GameUnits,
    /// Lowest pitch tried (degrees)
    pub pitch_min: f32,
    /// Highest pitch tried (degrees)
    pub pitch_max: f32,
    /// Pitch samples over `[pitch_min, pitch_max]`, both ends included
    pub pitch_samples: usize,
    /// Simulated time per candidate (seconds)
    pub max_sim_seconds: f32,
    /// Throw origin height (units)
    pub standing_height: GameUnits,
    /// Keep every n-th trajectory frame in a solution
    pub trajectory_decimation: usize,
    /// Result cap used when a caller gives none
    pub default_max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_accuracy: GameUnits::new(150.0),
            search_radius: GameUnits::new(500.0),
            grid_step: GameUnits::new(100.0),
            pitch_min: -20.0,
            pitch_max: 60.0,
            pitch_samples: 10,
            max_sim_seconds: 2.0,
            standing_height: GameUnits::new(72.0),
            trajectory_decimation: 10,
            default_max_results: 10,
        }
    }
}

impl SearchConfig {
    /// Pitch values swept at every grid point
    pub fn pitches(&self) -> Vec<f32> {
        linspace(self.pitch_min, self.pitch_max, self.pitch_samples)
    }

    /// Grid coordinates along one axis: `[center − R, center + R)` in steps
    pub fn axis_samples(&self, center: f32) -> Vec<f32> {
        let radius = *self.search_radius;
        let step = *self.grid_step;
        let start = center - radius;
        let count = ((2.0 * radius) / step).ceil() as usize;
        (0..count)
            .map(|i| start + i as f32 * step)
            .filter(|&v| v < center + radius)
            .collect()
    }

    /// Reject values that would make the search empty or endless
    ///
    /// # Errors
    /// `InvalidInput` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("max_accuracy", *self.max_accuracy),
            ("search_radius", *self.search_radius),
            ("grid_step", *self.grid_step),
            ("max_sim_seconds", self.max_sim_seconds),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SmokeError::invalid_input(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }
        if !(self.pitch_min.is_finite() && self.pitch_max.is_finite())
            || self.pitch_min > self.pitch_max
        {
            return Err(SmokeError::invalid_input(format!(
                "pitch range [{}, {}] is invalid",
                self.pitch_min, self.pitch_max
            )));
        }
        if !self.standing_height.is_finite() {
            return Err(SmokeError::invalid_input("standing_height must be finite"));
        }
        for (name, value) in [
            ("pitch_samples", self.pitch_samples),
            ("trajectory_decimation", self.trajectory_decimation),
            ("default_max_results", self.default_max_results),
        ] {
            if value == 0 {
                return Err(SmokeError::invalid_input(format!("{name} must be at least 1")));
            }
        }
        Ok(())
    }

    /// Load search parameters from JSON. Missing fields take defaults.
    ///
    /// # Errors
    /// `InvalidInput` if the file cannot be read, parsed or validated.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SmokeError::invalid_input(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|e| {
            SmokeError::invalid_input(format!("cannot parse {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }
}
