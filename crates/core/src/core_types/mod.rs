//! Core types and utilities

pub mod error;
pub mod throw_type;
pub mod units;
pub mod vec3;

pub use error::{Result, SmokeError};
pub use throw_type::ThrowType;
pub use units::{GameUnits, Meters};
pub use vec3::{horizontal_distance, vec3_from_slice, Vec3};
