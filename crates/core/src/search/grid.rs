//! Grid-sweep position search
//!
//! Candidate throw positions form a square grid around the target at eye
//! height. At each grid point the player faces the target and every pitch
//! in the configured sweep is simulated. Throws landing within the accuracy
//! limit become solutions.
//!
//! Grid points are evaluated in parallel. Each worker builds its own world
//! through the factory, so no physics state is shared and the ranked output
//! does not depend on thread scheduling.

use super::config::SearchConfig;
use super::solution::{decimate, Angles, SmokeSolution};
use super::strategy::SearchStrategy;
use crate::core_types::error::{Result, SmokeError};
use crate::core_types::throw_type::ThrowType;
use crate::core_types::vec3::Vec3;
use crate::physics::yaw_towards;
use crate::simulation::{simulate_throw, SimulationContext};
use crate::world::CollisionWorld;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Finds throw positions whose simulated landing is near a target.
///
/// `F` builds a ready world (gravity set, scene added) for one worker.
pub struct PositionSearcher<'a, F> {
    context: &'a SimulationContext,
    world_factory: F,
}

impl<'a, F> PositionSearcher<'a, F> {
    /// Searcher using `context` for constants and `world_factory` for worlds
    pub fn new(context: &'a SimulationContext, world_factory: F) -> Self {
        Self {
            context,
            world_factory,
        }
    }

    fn search_config(&self) -> &SearchConfig {
        self.context.search_config()
    }

    /// Ranked solutions for `target`, best first, at most `max_results`.
    ///
    /// Individual candidates that fail to simulate are logged and skipped;
    /// an empty result is not an error.
    ///
    /// # Errors
    /// `InvalidInput` if `target` is not finite.
    pub fn find_solutions<W>(
        &self,
        target: &Vec3,
        throw_type: ThrowType,
        strategy: SearchStrategy,
        max_results: usize,
    ) -> Result<Vec<SmokeSolution>>
    where
        F: Fn() -> Result<W> + Sync,
        W: CollisionWorld,
    {
        if !target.iter().all(|c| c.is_finite()) {
            return Err(SmokeError::invalid_input("target position must be finite"));
        }
        if strategy.is_grid_alias() {
            info!("{} search runs the grid sweep", strategy);
        }

        let started = Instant::now();
        let mut solutions = self.grid_search(target, throw_type);
        let found = solutions.len();

        solutions.sort_by(|a, b| a.accuracy.total_cmp(&b.accuracy));
        solutions.truncate(max_results);

        info!(
            "Found {} solutions ({} kept) for target [{:.1}, {:.1}, {:.1}] in {:.2}s",
            found,
            solutions.len(),
            target.x,
            target.y,
            target.z,
            started.elapsed().as_secs_f32()
        );
        Ok(solutions)
    }

    /// All candidates under the accuracy limit, in enumeration order
    fn grid_search<W>(&self, target: &Vec3, throw_type: ThrowType) -> Vec<SmokeSolution>
    where
        F: Fn() -> Result<W> + Sync,
        W: CollisionWorld,
    {
        let config = self.search_config();
        let xs = config.axis_samples(target.x);
        let ys = config.axis_samples(target.y);
        let points: Vec<Vec3> = xs
            .iter()
            .flat_map(|&x| ys.iter().map(move |&y| Vec3::new(x, y, *config.standing_height)))
            .collect();
        let pitches = config.pitches();

        debug!(
            "Grid search: {} positions × {} pitches, radius {:.1} ({:.2})",
            points.len(),
            pitches.len(),
            config.search_radius,
            self.context.config().units_to_meters(config.search_radius)
        );

        points
            .par_iter()
            .map(|origin| self.evaluate_point(origin, target, &pitches, throw_type))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }

    /// Sweep every pitch from one grid point
    fn evaluate_point<W>(
        &self,
        origin: &Vec3,
        target: &Vec3,
        pitches: &[f32],
        throw_type: ThrowType,
    ) -> Vec<SmokeSolution>
    where
        F: Fn() -> Result<W> + Sync,
        W: CollisionWorld,
    {
        let config = self.search_config();
        let mut world = match (self.world_factory)() {
            Ok(world) => world,
            Err(e) => {
                warn!("Skipping grid point [{:.1}, {:.1}]: {}", origin.x, origin.y, e);
                return Vec::new();
            }
        };

        let yaw = yaw_towards(origin, target);
        let mut solutions = Vec::new();

        for &pitch in pitches {
            let outcome = simulate_throw(
                &mut world,
                self.context.config(),
                self.context.converter(),
                origin,
                pitch,
                yaw,
                throw_type,
                config.max_sim_seconds,
            );

            let (trajectory, result) = match outcome {
                Ok(run) => run,
                Err(e) => {
                    warn!(
                        "Dropping candidate at [{:.1}, {:.1}] pitch {:.1}: {}",
                        origin.x, origin.y, pitch, e
                    );
                    continue;
                }
            };

            let accuracy = (result.final_position - target).norm();
            if accuracy < *config.max_accuracy {
                solutions.push(SmokeSolution::new(
                    *origin,
                    Angles { pitch, yaw },
                    throw_type,
                    *target,
                    result.final_position,
                    accuracy,
                    decimate(&trajectory, config.trajectory_decimation),
                    result.bounces,
                ));
            }
        }

        solutions
    }
}
