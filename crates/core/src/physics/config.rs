//! Physical constants for the grenade simulation
//!
//! Every constant the simulator needs lives in one immutable `PhysicsConfig`.
//! Values are expressed the way the game expresses them (units, units/s,
//! units/s²) except for the projectile body itself, whose mass, radius and
//! damping coefficients are handed to the physics backend in SI units.
//!
//! `units_per_meter` is the only unit conversion factor. `meters_per_unit`
//! is derived from it on demand so positions, speeds and gravity can never
//! drift apart.

use crate::core_types::error::{Result, SmokeError};
use crate::core_types::throw_type::ThrowType;
use crate::core_types::units::{GameUnits, Meters};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Launch speeds for each throw type, in game units per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrowSpeeds {
    /// Left-click throw (units/s)
    pub strong: f32,
    /// Both-buttons throw (units/s)
    pub medium: f32,
    /// Right-click lob (units/s)
    pub weak: f32,
}

impl Default for ThrowSpeeds {
    fn default() -> Self {
        Self {
            strong: 1000.0,
            medium: 600.0,
            weak: 400.0,
        }
    }
}

/// Immutable process-wide physics constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity magnitude (units/s²)
    pub gravity: f32,
    /// Fixed simulation step (seconds)
    pub time_step: f32,

    /// Grenade mass (kg)
    pub grenade_mass: f32,
    /// Grenade collision radius
    pub grenade_radius: Meters,
    /// Coefficient of restitution for grenade and map surfaces
    pub grenade_restitution: f32,
    /// Sliding friction for grenade and map surfaces
    pub grenade_friction: f32,
    /// Linear velocity damping (air resistance)
    pub grenade_linear_damping: f32,
    /// Angular velocity damping
    pub grenade_angular_damping: f32,

    /// Launch speed table
    pub throw_speeds: ThrowSpeeds,

    /// Player height
    pub player_height: Meters,
    /// Hand height above the feet at release
    pub hand_height: Meters,

    /// Game units per meter (1 unit = 1 inch)
    pub units_per_meter: f32,

    /// Speed change between two steps that counts as a bounce (units/s)
    pub bounce_speed_delta: f32,
    /// Speed below which the grenade is considered at rest (units/s)
    pub rest_speed: f32,
    /// Steps that must elapse before the rest check may end a run
    pub min_steps_before_rest: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 800.0,
            time_step: 1.0 / 120.0,
            grenade_mass: 0.5,
            grenade_radius: Meters::new(0.1),
            grenade_restitution: 0.45,
            grenade_friction: 0.5,
            grenade_linear_damping: 0.03,
            grenade_angular_damping: 0.1,
            throw_speeds: ThrowSpeeds::default(),
            player_height: Meters::new(1.8),
            hand_height: Meters::new(0.56),
            units_per_meter: 39.37,
            bounce_speed_delta: 100.0,
            rest_speed: 10.0,
            min_steps_before_rest: 50,
        }
    }
}

impl PhysicsConfig {
    /// Default configuration matching CS2 grenade behavior
    pub fn cs2_default() -> Self {
        Self::default()
    }

    /// Meters per game unit, derived from `units_per_meter`
    #[inline]
    pub fn meters_per_unit(&self) -> f32 {
        1.0 / self.units_per_meter
    }

    /// Launch speed for a throw type (units/s)
    pub fn throw_speed(&self, throw_type: ThrowType) -> f32 {
        match throw_type {
            ThrowType::Strong => self.throw_speeds.strong,
            ThrowType::Medium => self.throw_speeds.medium,
            ThrowType::Weak => self.throw_speeds.weak,
        }
    }

    /// Convert a game-space length to meters
    #[inline]
    pub fn units_to_meters(&self, length: GameUnits) -> Meters {
        Meters::new(*length * self.meters_per_unit())
    }

    /// Convert a length in meters to game units
    #[inline]
    pub fn meters_to_units(&self, length: Meters) -> GameUnits {
        GameUnits::new(*length * self.units_per_meter)
    }

    /// Gravity magnitude in sim space (m/s²)
    #[inline]
    pub fn gravity_sim(&self) -> f32 {
        self.gravity * self.meters_per_unit()
    }

    /// Bounce detection threshold in sim space (m/s)
    #[inline]
    pub fn bounce_speed_delta_sim(&self) -> f32 {
        self.bounce_speed_delta * self.meters_per_unit()
    }

    /// Rest threshold in sim space (m/s)
    #[inline]
    pub fn rest_speed_sim(&self) -> f32 {
        self.rest_speed * self.meters_per_unit()
    }

    /// Check that every constant is usable by the simulator
    ///
    /// # Errors
    /// Returns `InvalidInput` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("gravity", self.gravity),
            ("time_step", self.time_step),
            ("grenade_mass", self.grenade_mass),
            ("grenade_radius", *self.grenade_radius),
            ("units_per_meter", self.units_per_meter),
            ("throw_speeds.strong", self.throw_speeds.strong),
            ("throw_speeds.medium", self.throw_speeds.medium),
            ("throw_speeds.weak", self.throw_speeds.weak),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SmokeError::invalid_input(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }

        let non_negative = [
            ("grenade_restitution", self.grenade_restitution),
            ("grenade_friction", self.grenade_friction),
            ("grenade_linear_damping", self.grenade_linear_damping),
            ("grenade_angular_damping", self.grenade_angular_damping),
            ("bounce_speed_delta", self.bounce_speed_delta),
            ("rest_speed", self.rest_speed),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SmokeError::invalid_input(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        Ok(())
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the file cannot be read, parsed or validated.
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_values() {
        let config = PhysicsConfig::cs2_default();
        assert_eq!(config.gravity, 800.0);
        assert_eq!(config.throw_speed(ThrowType::Strong), 1000.0);
        assert_eq!(config.throw_speed(ThrowType::Medium), 600.0);
        assert_eq!(config.throw_speed(ThrowType::Weak), 400.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_derived_factors_share_one_source() {
        let config = PhysicsConfig {
            units_per_meter: 40.0,
            ..Default::default()
        };
        assert_relative_eq!(config.meters_per_unit(), 0.025);
        assert_relative_eq!(config.gravity_sim(), 20.0);
        assert_relative_eq!(config.rest_speed_sim(), 0.25);
        assert_relative_eq!(config.bounce_speed_delta_sim(), 2.5);

        let back = config.meters_to_units(config.units_to_meters(GameUnits::new(72.0)));
        assert_relative_eq!(*back, 72.0, max_relative = 1e-6);
    }

    #[test]
    fn test_validate_rejects_zero_time_step() {
        let config = PhysicsConfig {
            time_step: 0.0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("time_step"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PhysicsConfig = serde_json::from_str(r#"{"gravity": 600.0}"#).unwrap();
        assert_eq!(config.gravity, 600.0);
        assert_eq!(config.time_step, 1.0 / 120.0);
        assert_eq!(config.grenade_radius, Meters::new(0.1));
    }
}
