//! Vector type alias for 3D positions, velocities and directions.

use crate::core_types::error::{Result, SmokeError};
use nalgebra::Vector3;

/// 3D vector type for positions, velocities, and directions.
///
/// This is a simple alias for `nalgebra::Vector3<f32>`. A `Vec3` carries no
/// unit of its own: whether it lives in game space (units, Z-up) or sim space
/// (meters, Y-up) is decided by the code that holds it.
pub type Vec3 = Vector3<f32>;

/// Build a [`Vec3`] from a slice, rejecting anything that is not exactly
/// three components long.
///
/// Request payloads and file formats hand us coordinates as plain arrays, so
/// this is the single place where dimensionality is checked.
///
/// # Errors
///
/// Returns [`SmokeError::InvalidInput`] when `components.len() != 3` or any
/// component is not finite.
pub fn vec3_from_slice(components: &[f32]) -> Result<Vec3> {
    let [x, y, z] = components else {
        return Err(SmokeError::invalid_input(format!(
            "position must contain 3 coordinates, got {}",
            components.len()
        )));
    };

    if !(x.is_finite() && y.is_finite() && z.is_finite()) {
        return Err(SmokeError::invalid_input(format!(
            "position coordinates must be finite, got [{x}, {y}, {z}]"
        )));
    }

    Ok(Vec3::new(*x, *y, *z))
}

/// Horizontal (XY-plane) distance between two game-space points.
#[inline]
pub fn horizontal_distance(a: &Vec3, b: &Vec3) -> f32 {
    (a.xy() - b.xy()).norm()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_from_slice_accepts_three() {
        let v = vec3_from_slice(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(v, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_vec3_from_slice_rejects_wrong_len() {
        assert!(matches!(
            vec3_from_slice(&[1.0, 2.0]),
            Err(SmokeError::InvalidInput(_))
        ));
        assert!(matches!(
            vec3_from_slice(&[1.0, 2.0, 3.0, 4.0]),
            Err(SmokeError::InvalidInput(_))
        ));
        assert!(vec3_from_slice(&[]).is_err());
    }

    #[test]
    fn test_vec3_from_slice_rejects_nan() {
        assert!(vec3_from_slice(&[1.0, f32::NAN, 3.0]).is_err());
    }

    #[test]
    fn test_horizontal_distance_ignores_height() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 4.0, 1000.0);
        assert!((horizontal_distance(&a, &b) - 5.0).abs() < 1e-6);
    }
}
