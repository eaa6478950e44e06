//! Physics constants, coordinate spaces and view-angle math

pub mod angles;
pub mod config;
pub mod coordinates;

pub use angles::{
    angle_between, clamp_angle, direction_from_angles, linspace, normalize_angle, optimal_pitch,
    yaw_towards,
};
pub use config::{PhysicsConfig, ThrowSpeeds};
pub use coordinates::CoordinateConverter;
