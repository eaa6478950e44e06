//! Game space ↔ simulation space conversion
//!
//! Game space (the map editor / console coordinates):
//! - X: east, Y: north, Z: up
//! - lengths in units (1 unit = 1 inch)
//!
//! Simulation space (the physics backend):
//! - X: east, Y: up, Z: north
//! - lengths in meters
//!
//! Positions are scaled and have their up/forward axes swapped. Directions
//! only get the axis swap. Velocities get both, so a speed in units/s turns
//! into the same speed in m/s.

use crate::core_types::error::Result;
use crate::core_types::vec3::{vec3_from_slice, Vec3};
use crate::physics::config::PhysicsConfig;

/// Swap the second and third components (north ↔ up).
#[inline]
fn swap_up_forward(v: &Vec3) -> Vec3 {
    Vec3::new(v.x, v.z, v.y)
}

/// Bidirectional mapping between game space and sim space.
///
/// Built from a `PhysicsConfig` so the scale comes from the same
/// `units_per_meter` the rest of the simulator uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateConverter {
    units_per_meter: f32,
}

impl CoordinateConverter {
    /// Create a converter using the config's unit scale
    pub fn new(config: &PhysicsConfig) -> Self {
        Self {
            units_per_meter: config.units_per_meter,
        }
    }

    /// Meters per game unit
    #[inline]
    pub fn meters_per_unit(&self) -> f32 {
        1.0 / self.units_per_meter
    }

    /// Game units per meter
    #[inline]
    pub fn units_per_meter(&self) -> f32 {
        self.units_per_meter
    }

    /// Game-space position → sim-space position
    #[inline]
    pub fn to_sim(&self, game: &Vec3) -> Vec3 {
        swap_up_forward(game) * self.meters_per_unit()
    }

    /// Sim-space position → game-space position
    #[inline]
    pub fn to_game(&self, sim: &Vec3) -> Vec3 {
        swap_up_forward(sim) * self.units_per_meter
    }

    /// Slice variant of [`Self::to_sim`]
    ///
    /// # Errors
    /// `InvalidInput` unless the slice holds exactly three finite values.
    pub fn to_sim_slice(&self, game: &[f32]) -> Result<Vec3> {
        Ok(self.to_sim(&vec3_from_slice(game)?))
    }

    /// Slice variant of [`Self::to_game`]
    ///
    /// # Errors
    /// `InvalidInput` unless the slice holds exactly three finite values.
    pub fn to_game_slice(&self, sim: &[f32]) -> Result<Vec3> {
        Ok(self.to_game(&vec3_from_slice(sim)?))
    }

    /// Game-space direction → sim-space direction (axis swap only)
    #[inline]
    pub fn direction_to_sim(&self, dir: &Vec3) -> Vec3 {
        swap_up_forward(dir)
    }

    /// Sim-space direction → game-space direction (axis swap only)
    #[inline]
    pub fn direction_to_game(&self, dir: &Vec3) -> Vec3 {
        swap_up_forward(dir)
    }

    /// Game-space velocity (units/s) → sim-space velocity (m/s)
    #[inline]
    pub fn velocity_to_sim(&self, velocity: &Vec3) -> Vec3 {
        self.to_sim(velocity)
    }

    /// Sim-space velocity (m/s) → game-space velocity (units/s)
    #[inline]
    pub fn velocity_to_game(&self, velocity: &Vec3) -> Vec3 {
        self.to_game(velocity)
    }

    /// Speed in units/s → m/s
    #[inline]
    pub fn speed_to_sim(&self, speed: f32) -> f32 {
        speed * self.meters_per_unit()
    }

    /// Speed in m/s → units/s
    #[inline]
    pub fn speed_to_game(&self, speed: f32) -> f32 {
        speed * self.units_per_meter
    }
}

impl Default for CoordinateConverter {
    fn default() -> Self {
        Self::new(&PhysicsConfig::default())
    }
}
