//! Semantic unit types for lengths and speeds
//!
//! The game measures everything in "units" (one unit is one inch), while the
//! physics backend works in meters. Mixing the two silently is the classic way
//! to get a grenade that flies 39 times too far, so quantities that cross the
//! boundary are wrapped in newtypes.
//!
//! # Design Philosophy
//! - f32 throughout, matching the physics backend precision
//! - Implements common traits (Add, Sub, Mul, Div, Ord, Display, etc.)
//! - Conversion between the two goes through `PhysicsConfig`, never a literal
//! - Serde support (serialized as the bare number)
//! - Total ordering via Ord trait (NaN handled as greater than all values)
//!
//! # Usage
//! ```
//! use smoke_sim_core::core_types::units::{GameUnits, Meters};
//!
//! let radius = GameUnits::new(500.0);
//! let step = GameUnits::new(100.0);
//! assert_eq!(*(radius / *step), 5.0);
//! assert!(Meters::new(1.0) < Meters::new(2.0));
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Deref, Div, Mul, Neg, Sub};

/// Defines a length-like newtype over `f32` with total ordering, arithmetic
/// with itself and scaling by plain `f32`.
macro_rules! length_unit {
    ($(#[$meta:meta])* $name:ident, $suffix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        #[repr(transparent)]
        pub struct $name(f32);

        impl $name {
            /// Zero length
            pub const ZERO: $name = $name(0.0);

            /// Wrap a raw value
            #[inline]
            #[must_use]
            pub const fn new(value: f32) -> Self {
                $name(value)
            }

            /// Raw value
            #[inline]
            #[must_use]
            pub const fn value(self) -> f32 {
                self.0
            }

            /// Absolute value
            #[inline]
            #[must_use]
            pub fn abs(self) -> Self {
                $name(self.0.abs())
            }
        }

        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.total_cmp(&other.0)
            }
        }

        impl Deref for $name {
            type Target = f32;
            #[inline]
            fn deref(&self) -> &f32 {
                &self.0
            }
        }

        impl From<f32> for $name {
            fn from(v: f32) -> Self {
                $name(v)
            }
        }

        impl From<$name> for f32 {
            fn from(v: $name) -> f32 {
                v.0
            }
        }

        impl Add for $name {
            type Output = $name;
            fn add(self, rhs: $name) -> $name {
                $name(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = $name;
            fn sub(self, rhs: $name) -> $name {
                $name(self.0 - rhs.0)
            }
        }

        impl Neg for $name {
            type Output = $name;
            fn neg(self) -> $name {
                $name(-self.0)
            }
        }

        impl Mul<f32> for $name {
            type Output = $name;
            fn mul(self, rhs: f32) -> $name {
                $name(self.0 * rhs)
            }
        }

        impl Div<f32> for $name {
            type Output = $name;
            fn div(self, rhs: f32) -> $name {
                $name(self.0 / rhs)
            }
        }

        impl PartialEq<f32> for $name {
            fn eq(&self, other: &f32) -> bool {
                self.0 == *other
            }
        }

        impl PartialOrd<f32> for $name {
            fn partial_cmp(&self, other: &f32) -> Option<Ordering> {
                self.0.partial_cmp(other)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if let Some(precision) = f.precision() {
                    write!(f, "{:.*}{}", precision, self.0, $suffix)
                } else {
                    write!(f, "{}{}", self.0, $suffix)
                }
            }
        }
    };
}

length_unit!(
    /// Length in game units (Source-engine inches)
    GameUnits,
    "u"
);

length_unit!(
    /// Length in meters (physics backend space)
    Meters,
    "m"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_and_arithmetic() {
        let a = GameUnits::new(150.0);
        let b = GameUnits::new(100.0);
        assert!(b < a);
        assert_eq!(a - b, GameUnits::new(50.0));
        assert_eq!(b * 2.0, GameUnits::new(200.0));
        assert_eq!(-b, GameUnits::new(-100.0));
        assert!(a < 151.0);
    }

    #[test]
    fn test_nan_sorts_last() {
        let mut values = [Meters::new(f32::NAN), Meters::new(1.0), Meters::new(0.5)];
        values.sort();
        assert_eq!(values[0], Meters::new(0.5));
        assert!(values[2].is_nan());
    }

    #[test]
    fn test_display_with_precision() {
        assert_eq!(format!("{:.1}", GameUnits::new(72.0)), "72.0u");
        assert_eq!(format!("{}", Meters::new(0.1)), "0.1m");
    }

    #[test]
    fn test_serializes_as_bare_number() {
        let json = serde_json::to_string(&GameUnits::new(500.0)).unwrap();
        assert_eq!(json, "500.0");
        let back: Meters = serde_json::from_str("0.25").unwrap();
        assert_eq!(back, Meters::new(0.25));
    }
}
