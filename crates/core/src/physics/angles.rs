//! View-angle helpers
//!
//! Angles are in degrees at every public boundary, matching the game's
//! `setang` console command. Pitch is measured up from the horizontal,
//! yaw counter-clockwise from east (+X).

use crate::core_types::vec3::Vec3;

/// Unit throw direction in game space for the given view angles.
///
/// ```text
/// dir = (cos p · cos y, cos p · sin y, sin p)
/// ```
pub fn direction_from_angles(pitch_deg: f32, yaw_deg: f32) -> Vec3 {
    let (sin_p, cos_p) = pitch_deg.to_radians().sin_cos();
    let (sin_y, cos_y) = yaw_deg.to_radians().sin_cos();
    Vec3::new(cos_p * cos_y, cos_p * sin_y, sin_p)
}

/// Yaw (degrees) that faces from `from` towards `to` in the horizontal plane.
pub fn yaw_towards(from: &Vec3, to: &Vec3) -> f32 {
    let delta = to - from;
    delta.y.atan2(delta.x).to_degrees()
}

/// Normalize an angle to `[0, 360)`.
pub fn normalize_angle(angle_deg: f32) -> f32 {
    let wrapped = angle_deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Clamp an angle into `[min_deg, max_deg]`.
pub fn clamp_angle(angle_deg: f32, min_deg: f32, max_deg: f32) -> f32 {
    angle_deg.clamp(min_deg, max_deg)
}

/// Angle between two vectors in degrees, in `[0, 180]`.
///
/// Returns `None` when either vector has zero length.
pub fn angle_between(a: &Vec3, b: &Vec3) -> Option<f32> {
    let norms = a.norm() * b.norm();
    if norms == 0.0 || !norms.is_finite() {
        return None;
    }
    // Rounding can push the cosine just outside [-1, 1]
    let cos = (a.dot(b) / norms).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Launch pitch (degrees) of the flatter drag-free arc that covers
/// `distance` on level ground at `speed` under `gravity`.
///
/// ```text
/// θ = ½ · asin(g · d / v²)
/// ```
///
/// Out-of-range targets clamp `sin 2θ` to `[-1, 1]`, giving 45° at the far
/// limit. A zero or non-finite speed yields 45°.
pub fn optimal_pitch(distance: f32, speed: f32, gravity: f32) -> f32 {
    if speed == 0.0 || !speed.is_finite() {
        return 45.0;
    }
    let sin_2theta = (gravity * distance / (speed * speed)).clamp(-1.0, 1.0);
    if sin_2theta.is_nan() {
        return 45.0;
    }
    0.5 * sin_2theta.asin().to_degrees()
}

/// `count` evenly spaced samples over `[start, end]`, both ends included.
///
/// A single sample yields `start`; zero samples yield nothing.
pub fn linspace(start: f32, end: f32, count: usize) -> Vec<f32> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f32;
            (0..count)
                .map(|i| {
                    if i == count - 1 {
                        end
                    } else {
                        start + step * i as f32
                    }
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_direction_is_unit() {
        for (pitch, yaw) in [(0.0, 0.0), (30.0, 45.0), (-20.0, 200.0), (90.0, 10.0)] {
            let d = direction_from_angles(pitch, yaw);
            assert_relative_eq!(d.norm(), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_direction_axes() {
        let east = direction_from_angles(0.0, 0.0);
        assert_abs_diff_eq!(east, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);

        let north = direction_from_angles(0.0, 90.0);
        assert_abs_diff_eq!(north, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);

        let up = direction_from_angles(90.0, 0.0);
        assert_abs_diff_eq!(up, Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_yaw_towards() {
        let from = Vec3::new(0.0, 0.0, 72.0);
        assert_relative_eq!(yaw_towards(&from, &Vec3::new(100.0, 100.0, 50.0)), 45.0, epsilon = 1e-4);
        assert_relative_eq!(yaw_towards(&from, &Vec3::new(-100.0, 0.0, 0.0)), 180.0, epsilon = 1e-4);
    }

    #[test]
    fn test_normalize_and_clamp() {
        assert_relative_eq!(normalize_angle(-90.0), 270.0);
        assert_relative_eq!(normalize_angle(720.0), 0.0);
        assert!(normalize_angle(-1e-9) < 360.0);
        assert_eq!(clamp_angle(120.0, -89.0, 89.0), 89.0);
    }

    #[test]
    fn test_angle_between() {
        let x = Vec3::x();
        assert_relative_eq!(angle_between(&x, &Vec3::y()).unwrap(), 90.0, epsilon = 1e-4);
        assert_relative_eq!(angle_between(&x, &(-x)).unwrap(), 180.0, epsilon = 1e-4);
        assert_relative_eq!(angle_between(&x, &(x * 3.0)).unwrap(), 0.0, epsilon = 1e-3);
        assert_relative_eq!(
            angle_between(&x, &Vec3::new(1.0, 1.0, 0.0)).unwrap(),
            45.0,
            epsilon = 1e-4
        );
        assert!(angle_between(&x, &Vec3::zeros()).is_none());
    }

    #[test]
    fn test_optimal_pitch() {
        assert_eq!(optimal_pitch(500.0, 0.0, 800.0), 45.0);

        // g·d/v² = 0.5 → 2θ = 30°
        assert_relative_eq!(optimal_pitch(625.0, 1000.0, 800.0), 15.0, epsilon = 1e-4);

        // Beyond maximum range clamps to 45°, negative range to -45°
        assert_relative_eq!(optimal_pitch(1e6, 1000.0, 800.0), 45.0, epsilon = 1e-4);
        assert_relative_eq!(optimal_pitch(-1e6, 1000.0, 800.0), -45.0, epsilon = 1e-4);

        assert_eq!(optimal_pitch(0.0, 1000.0, 800.0), 0.0);
    }

    #[test]
    fn test_linspace_matches_pitch_sweep() {
        let pitches = linspace(-20.0, 60.0, 10);
        assert_eq!(pitches.len(), 10);
        assert_eq!(pitches[0], -20.0);
        assert_eq!(pitches[9], 60.0);
        assert_relative_eq!(pitches[1], -20.0 + 80.0 / 9.0, epsilon = 1e-5);
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(5.0, 9.0, 1), vec![5.0]);
    }
}
