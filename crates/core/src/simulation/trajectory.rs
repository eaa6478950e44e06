//! Single-throw trajectory simulation
//!
//! A throw is one dynamic sphere launched into a `CollisionWorld`, stepped at
//! the fixed rate until it comes to rest or the time budget runs out. Physics
//! runs in sim space; everything returned to the caller is in game space.

use crate::core_types::error::{Result, SmokeError};
use crate::core_types::throw_type::ThrowType;
use crate::core_types::vec3::Vec3;
use crate::physics::{direction_from_angles, linspace, CoordinateConverter, PhysicsConfig};
use crate::world::{BodyHandle, CollisionWorld, SphereDesc, SurfaceMaterial};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Summary of a finished throw
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Where the grenade ended up (game space)
    pub final_position: Vec3,
    /// Speed at the last step (units/s)
    pub final_speed: f32,
    /// Bounces detected by the speed-delta heuristic
    pub bounces: u32,
    /// Simulated seconds (`steps × time_step`)
    pub time_elapsed: f32,
    /// Number of recorded trajectory frames
    pub trajectory_length: usize,
}

/// Frames reserved up front; longer runs grow the buffer as they go
const TRAJECTORY_PREALLOC: usize = 4096;

/// Number of fixed steps a time budget allows, saturating at `usize::MAX`
fn step_budget(max_sim_seconds: f32, time_step: f32) -> usize {
    // Keep 1.0 / (1/120) from rounding up to 121
    let exact = (f64::from(max_sim_seconds) / f64::from(time_step) - 1e-9).ceil();
    if exact.is_nan() || exact <= 0.0 {
        0
    } else if exact >= usize::MAX as f64 {
        usize::MAX
    } else {
        exact as usize
    }
}

/// Simulate one throw against `world`.
///
/// The world must already hold the map geometry and gravity. Exactly one
/// dynamic body is created and it is always destroyed before returning.
///
/// # Errors
/// - `InvalidInput` for a non-positive or non-finite `max_sim_seconds`, or
///   non-finite start position or angles. Nothing is created in that case.
/// - `SimulationFailure` if the world fails while stepping or being queried.
#[allow(clippy::too_many_arguments)]
pub fn simulate_throw<W: CollisionWorld + ?Sized>(
    world: &mut W,
    config: &PhysicsConfig,
    converter: &CoordinateConverter,
    start: &Vec3,
    pitch_deg: f32,
    yaw_deg: f32,
    throw_type: ThrowType,
    max_sim_seconds: f32,
) -> Result<(Vec<Vec3>, SimulationResult)> {
    if !(max_sim_seconds.is_finite() && max_sim_seconds > 0.0) {
        return Err(SmokeError::invalid_input(format!(
            "max_sim_seconds must be positive, got {max_sim_seconds}"
        )));
    }
    if !start.iter().all(|c| c.is_finite()) {
        return Err(SmokeError::invalid_input("start position must be finite"));
    }
    if !(pitch_deg.is_finite() && yaw_deg.is_finite()) {
        return Err(SmokeError::invalid_input(format!(
            "angles must be finite, got pitch {pitch_deg}, yaw {yaw_deg}"
        )));
    }

    let direction = converter.direction_to_sim(&direction_from_angles(pitch_deg, yaw_deg));
    let speed = converter.speed_to_sim(config.throw_speed(throw_type));

    let desc = SphereDesc {
        position: converter.to_sim(start),
        velocity: direction * speed,
        radius: *config.grenade_radius,
        mass: config.grenade_mass,
        material: SurfaceMaterial::new(config.grenade_restitution, config.grenade_friction),
        linear_damping: config.grenade_linear_damping,
        angular_damping: config.grenade_angular_damping,
    };
    let body = world.create_dynamic_sphere(&desc)?;

    let outcome = run_steps(world, config, converter, body, max_sim_seconds);

    // Body goes away on every path
    let destroyed = world.destroy_body(body);

    let (trajectory, result) = outcome?;
    if let Err(e) = destroyed {
        warn!("Failed to destroy projectile {}: {}", body.id(), e);
        return Err(e.into());
    }

    debug!(
        "{} throw pitch={:.1} yaw={:.1} landed at [{:.1}, {:.1}, {:.1}] after {:.2}s, {} bounces",
        throw_type,
        pitch_deg,
        yaw_deg,
        result.final_position.x,
        result.final_position.y,
        result.final_position.z,
        result.time_elapsed,
        result.bounces
    );

    Ok((trajectory, result))
}

fn run_steps<W: CollisionWorld + ?Sized>(
    world: &mut W,
    config: &PhysicsConfig,
    converter: &CoordinateConverter,
    body: BodyHandle,
    max_sim_seconds: f32,
) -> Result<(Vec<Vec3>, SimulationResult)> {
    let max_steps = step_budget(max_sim_seconds, config.time_step);
    let bounce_delta = config.bounce_speed_delta_sim();
    let rest_speed = config.rest_speed_sim();
    let min_steps = config.min_steps_before_rest as usize;

    let mut trajectory = Vec::with_capacity(max_steps.min(TRAJECTORY_PREALLOC));
    let mut position = world.position(body)?;
    let mut speed = world.velocity(body)?.norm();
    let mut previous_speed = speed;
    let mut bounces = 0u32;
    let mut steps_run = 0usize;

    while steps_run < max_steps {
        world.step(config.time_step)?;
        steps_run += 1;

        position = world.position(body)?;
        speed = world.velocity(body)?.norm();
        trajectory.push(converter.to_game(&position));

        if (speed - previous_speed).abs() > bounce_delta {
            bounces += 1;
            trace!("Bounce {} at step {} (speed {:.3} m/s)", bounces, steps_run, speed);
        }
        previous_speed = speed;

        if speed < rest_speed && steps_run >= min_steps {
            trace!("At rest after {} steps", steps_run);
            break;
        }
    }

    let result = SimulationResult {
        final_position: converter.to_game(&position),
        final_speed: converter.speed_to_game(speed),
        bounces,
        time_elapsed: steps_run as f32 * config.time_step,
        trajectory_length: trajectory.len(),
    };
    Ok((trajectory, result))
}

// ============================================================================
// TRAJECTORY METRICS
// ============================================================================

/// Aggregate shape of a recorded trajectory
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryMetrics {
    /// Path length along the recorded points (units)
    pub total_distance: f32,
    /// Highest z reached (units)
    pub max_height: f32,
    /// Lowest z reached (units)
    pub min_height: f32,
    /// Number of recorded points
    pub num_points: usize,
    /// Duration estimate, one time step per point (seconds)
    pub duration: f32,
}

impl TrajectoryMetrics {
    /// Measure a game-space trajectory. Returns `None` for an empty one.
    pub fn from_trajectory(trajectory: &[Vec3], time_step: f32) -> Option<Self> {
        let first = trajectory.first()?;

        let total_distance = trajectory.windows(2).map(|w| (w[1] - w[0]).norm()).sum();
        let (min_height, max_height) = trajectory
            .iter()
            .fold((first.z, first.z), |(lo, hi), p| (lo.min(p.z), hi.max(p.z)));

        Some(Self {
            total_distance,
            max_height,
            min_height,
            num_points: trajectory.len(),
            duration: trajectory.len() as f32 * time_step,
        })
    }
}

/// Resample a trajectory to `num_points` points evenly spaced by path length.
///
/// Each coordinate is interpolated linearly along the cumulative arc length.
/// Trajectories with fewer than two points, or whose points all coincide,
/// are returned unchanged.
pub fn resample_trajectory(trajectory: &[Vec3], num_points: usize) -> Vec<Vec3> {
    if trajectory.len() < 2 {
        return trajectory.to_vec();
    }

    let mut cumulative = Vec::with_capacity(trajectory.len());
    let mut total = 0.0f32;
    cumulative.push(0.0);
    for w in trajectory.windows(2) {
        total += (w[1] - w[0]).norm();
        cumulative.push(total);
    }
    if total == 0.0 {
        return trajectory.to_vec();
    }

    let mut segment = 0;
    linspace(0.0, total, num_points)
        .into_iter()
        .map(|d| {
            while segment + 2 < cumulative.len() && cumulative[segment + 1] < d {
                segment += 1;
            }
            let (d0, d1) = (cumulative[segment], cumulative[segment + 1]);
            let (p0, p1) = (trajectory[segment], trajectory[segment + 1]);
            if d1 > d0 {
                p0 + (p1 - p0) * ((d - d0) / (d1 - d0)).clamp(0.0, 1.0)
            } else {
                p0
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{StaticGeometry, WorldError};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rustc_hash::FxHashMap;

    /// Ballistic point-mass world with a floor at sim y = 0 and scripted
    /// failures, for exercising the simulator without a physics engine.
    struct ScriptedWorld {
        gravity: Vec3,
        bodies: FxHashMap<u64, (Vec3, Vec3)>,
        statics: usize,
        next_id: u64,
        steps: usize,
        fail_step_at: Option<usize>,
        fail_create: bool,
        created: usize,
    }

    impl CollisionWorld for ScriptedWorld {
        fn set_gravity(&mut self, gravity: Vec3) {
            self.gravity = gravity;
        }

        fn create_static_body(
            &mut self,
            _geometry: &StaticGeometry,
            _material: SurfaceMaterial,
        ) -> std::result::Result<BodyHandle, WorldError> {
            self.statics += 1;
            self.next_id += 1;
            Ok(BodyHandle::new(self.next_id))
        }

        fn create_dynamic_sphere(
            &mut self,
            desc: &SphereDesc,
        ) -> std::result::Result<BodyHandle, WorldError> {
            if self.fail_create {
                return Err(WorldError::Backend("scripted create failure".into()));
            }
            self.created += 1;
            self.next_id += 1;
            self.bodies
                .insert(self.next_id, (desc.position, desc.velocity));
            Ok(BodyHandle::new(self.next_id))
        }

        fn destroy_body(&mut self, handle: BodyHandle) -> std::result::Result<(), WorldError> {
            self.bodies
                .remove(&handle.id())
                .map(|_| ())
                .ok_or(WorldError::UnknownBody(handle.id()))
        }

        fn step(&mut self, dt: f32) -> std::result::Result<(), WorldError> {
            self.steps += 1;
            if self.fail_step_at == Some(self.steps) {
                return Err(WorldError::Backend("scripted step failure".into()));
            }
            for (pos, vel) in self.bodies.values_mut() {
                *vel += self.gravity * dt;
                *pos += *vel * dt;
                if pos.y < 0.0 {
                    pos.y = 0.0;
                    *vel = Vec3::zeros();
                }
            }
            Ok(())
        }

        fn position(&self, handle: BodyHandle) -> std::result::Result<Vec3, WorldError> {
            self.bodies
                .get(&handle.id())
                .map(|b| b.0)
                .ok_or(WorldError::UnknownBody(handle.id()))
        }

        fn velocity(&self, handle: BodyHandle) -> std::result::Result<Vec3, WorldError> {
            self.bodies
                .get(&handle.id())
                .map(|b| b.1)
                .ok_or(WorldError::UnknownBody(handle.id()))
        }

        fn ray_test(&self, _from: &Vec3, _to: &Vec3) -> f32 {
            1.0
        }

        fn static_body_count(&self) -> usize {
            self.statics
        }

        fn dynamic_body_count(&self) -> usize {
            self.bodies.len()
        }
    }

    fn scripted_world(config: &PhysicsConfig) -> ScriptedWorld {
        let mut world = ScriptedWorld {
            gravity: Vec3::zeros(),
            bodies: FxHashMap::default(),
            statics: 0,
            next_id: 0,
            steps: 0,
            fail_step_at: None,
            fail_create: false,
            created: 0,
        };
        world.set_gravity(Vec3::new(0.0, -config.gravity_sim(), 0.0));
        world
    }

    #[test]
    fn test_step_budget() {
        assert_eq!(step_budget(1.0, 1.0 / 120.0), 120);
        assert_eq!(step_budget(2.0, 1.0 / 120.0), 240);
        assert_eq!(step_budget(0.01, 1.0 / 120.0), 2);
        assert_eq!(step_budget(f32::MAX, 1.0 / 120.0), usize::MAX);
        assert_eq!(step_budget(1e30, 1.0 / 120.0), usize::MAX);
    }

    #[test]
    fn test_huge_budget_stops_on_rest() {
        let config = PhysicsConfig::default();
        let conv = CoordinateConverter::new(&config);
        let mut world = scripted_world(&config);

        let (trajectory, result) = simulate_throw(
            &mut world,
            &config,
            &conv,
            &Vec3::new(0.0, 0.0, 72.0),
            30.0,
            0.0,
            ThrowType::Strong,
            f32::MAX,
        )
        .unwrap();
        assert_eq!(world.dynamic_body_count(), 0);
        assert!(trajectory.len() < TRAJECTORY_PREALLOC);
        assert_relative_eq!(result.final_position.z, 0.0);
    }

    #[test]
    fn test_rejects_non_positive_budget_before_creating_anything() {
        let config = PhysicsConfig::default();
        let conv = CoordinateConverter::new(&config);
        let mut world = scripted_world(&config);

        for budget in [0.0, -1.0, f32::NAN] {
            let err = simulate_throw(
                &mut world,
                &config,
                &conv,
                &Vec3::new(0.0, 0.0, 72.0),
                10.0,
                0.0,
                ThrowType::Strong,
                budget,
            )
            .unwrap_err();
            assert!(err.is_invalid_input());
        }
        assert_eq!(world.created, 0);
        assert_eq!(world.steps, 0);
    }

    #[test]
    fn test_lands_and_cleans_up() {
        let config = PhysicsConfig::default();
        let conv = CoordinateConverter::new(&config);
        let mut world = scripted_world(&config);

        let (trajectory, result) = simulate_throw(
            &mut world,
            &config,
            &conv,
            &Vec3::new(0.0, 0.0, 72.0),
            30.0,
            0.0,
            ThrowType::Medium,
            5.0,
        )
        .unwrap();

        assert_eq!(world.dynamic_body_count(), 0);
        assert_eq!(result.trajectory_length, trajectory.len());
        assert_relative_eq!(result.final_position.z, 0.0);
        assert!(result.final_position.x > 0.0);
        assert_relative_eq!(result.final_position.y, 0.0, epsilon = 1e-3);
        // Stopped early on the rest check
        assert!(trajectory.len() < 600);
        assert!(trajectory.len() >= config.min_steps_before_rest as usize);
        assert_relative_eq!(
            result.time_elapsed,
            trajectory.len() as f32 * config.time_step,
            max_relative = 1e-6
        );
        // Landing kills the speed in one step
        assert_eq!(result.bounces, 1);
        assert_eq!(result.final_speed, 0.0);
    }

    #[test]
    fn test_runs_full_budget_in_flight() {
        let config = PhysicsConfig::default();
        let conv = CoordinateConverter::new(&config);
        let mut world = scripted_world(&config);

        let (trajectory, result) = simulate_throw(
            &mut world,
            &config,
            &conv,
            &Vec3::new(0.0, 0.0, 5000.0),
            0.0,
            90.0,
            ThrowType::Weak,
            0.5,
        )
        .unwrap();
        assert_eq!(trajectory.len(), 60);
        assert_eq!(result.bounces, 0);
        assert_relative_eq!(result.time_elapsed, 0.5, max_relative = 1e-5);
    }

    #[test]
    fn test_step_failure_still_destroys_body() {
        let config = PhysicsConfig::default();
        let conv = CoordinateConverter::new(&config);
        let mut world = scripted_world(&config);
        world.fail_step_at = Some(10);

        let err = simulate_throw(
            &mut world,
            &config,
            &conv,
            &Vec3::new(0.0, 0.0, 72.0),
            0.0,
            0.0,
            ThrowType::Strong,
            2.0,
        )
        .unwrap_err();

        assert!(matches!(err, SmokeError::SimulationFailure(_)));
        assert_eq!(world.created, 1);
        assert_eq!(world.dynamic_body_count(), 0);
    }

    #[test]
    fn test_create_failure_is_simulation_failure() {
        let config = PhysicsConfig::default();
        let conv = CoordinateConverter::new(&config);
        let mut world = scripted_world(&config);
        world.fail_create = true;

        let err = simulate_throw(
            &mut world,
            &config,
            &conv,
            &Vec3::zeros(),
            0.0,
            0.0,
            ThrowType::Strong,
            1.0,
        )
        .unwrap_err();
        assert!(matches!(err, SmokeError::SimulationFailure(_)));
        assert_eq!(world.dynamic_body_count(), 0);
    }

    #[test]
    fn test_metrics() {
        let points = [
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(3.0, 4.0, 10.0),
            Vec3::new(3.0, 4.0, 50.0),
            Vec3::new(3.0, 4.0, 0.0),
        ];
        let metrics = TrajectoryMetrics::from_trajectory(&points, 0.5).unwrap();
        assert_relative_eq!(metrics.total_distance, 5.0 + 40.0 + 50.0);
        assert_eq!(metrics.max_height, 50.0);
        assert_eq!(metrics.min_height, 0.0);
        assert_eq!(metrics.num_points, 4);
        assert_relative_eq!(metrics.duration, 2.0);

        assert!(TrajectoryMetrics::from_trajectory(&[], 0.5).is_none());
    }

    #[test]
    fn test_resample_by_path_length() {
        let points = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            // Repeated point adds no length
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 30.0, 0.0),
        ];
        let resampled = resample_trajectory(&points, 5);
        assert_eq!(resampled.len(), 5);
        assert_abs_diff_eq!(resampled[0], points[0], epsilon = 1e-5);
        assert_abs_diff_eq!(resampled[1], Vec3::new(10.0, 0.0, 0.0), epsilon = 1e-4);
        assert_abs_diff_eq!(resampled[2], Vec3::new(10.0, 10.0, 0.0), epsilon = 1e-4);
        assert_abs_diff_eq!(resampled[4], points[3], epsilon = 1e-5);
    }

    #[test]
    fn test_resample_degenerate_input() {
        assert!(resample_trajectory(&[], 10).is_empty());

        let single = [Vec3::new(1.0, 2.0, 3.0)];
        assert_eq!(resample_trajectory(&single, 10), single.to_vec());

        let still = [Vec3::new(1.0, 2.0, 3.0); 4];
        assert_eq!(resample_trajectory(&still, 10), still.to_vec());

        let line = [Vec3::zeros(), Vec3::new(0.0, 0.0, 8.0)];
        assert!(resample_trajectory(&line, 0).is_empty());
    }
}
