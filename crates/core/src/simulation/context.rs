//! Explicit simulation context
//!
//! Holds everything a search or a request needs: physics constants, the
//! coordinate converter and the shared static scene. Worlds are built from
//! it on demand, one per worker, so nothing here is mutable after
//! construction.

use super::trajectory::{simulate_throw, SimulationResult};
use crate::core_types::error::Result;
use crate::core_types::throw_type::ThrowType;
use crate::core_types::vec3::Vec3;
use crate::physics::{CoordinateConverter, PhysicsConfig};
use crate::search::{PositionSearcher, SearchConfig, SearchStrategy, SmokeSolution};
use crate::world::{CollisionWorld, RapierWorld, Scene, SurfaceMaterial};
use std::sync::Arc;
use tracing::info;

/// Hit fraction at or above which a line of sight counts as clear
pub const LINE_OF_SIGHT_CLEAR: f32 = 0.99;

/// Configuration, scene and converter shared by every simulation
#[derive(Debug, Clone)]
pub struct SimulationContext {
    config: PhysicsConfig,
    search_config: SearchConfig,
    converter: CoordinateConverter,
    scene: Arc<Scene>,
}

impl SimulationContext {
    /// Create a context, validating both configurations.
    ///
    /// # Errors
    /// `InvalidInput` if either configuration is unusable.
    pub fn new(config: PhysicsConfig, search_config: SearchConfig, scene: Scene) -> Result<Self> {
        config.validate()?;
        search_config.validate()?;

        info!(
            "Simulation context ready: scene '{}' with {} objects, dt={:.5}s, {} units/m",
            scene.name,
            scene.len(),
            config.time_step,
            config.units_per_meter
        );

        Ok(Self {
            converter: CoordinateConverter::new(&config),
            config,
            search_config,
            scene: Arc::new(scene),
        })
    }

    /// Default constants against the built-in test scene
    ///
    /// # Errors
    /// Never in practice; defaults always validate.
    pub fn with_test_scene() -> Result<Self> {
        Self::new(
            PhysicsConfig::default(),
            SearchConfig::default(),
            Scene::test_scene(),
        )
    }

    /// Physics constants
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Search parameters
    pub fn search_config(&self) -> &SearchConfig {
        &self.search_config
    }

    /// Game ↔ sim converter
    pub fn converter(&self) -> &CoordinateConverter {
        &self.converter
    }

    /// Shared static scene
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Surface used for scene objects without their own material
    pub fn default_material(&self) -> SurfaceMaterial {
        SurfaceMaterial::new(self.config.grenade_restitution, self.config.grenade_friction)
    }

    /// Whether a world can be built from this context.
    ///
    /// Building a world is cheap relative to a search, so the probe builds
    /// one and throws it away.
    pub fn is_initialized(&self) -> bool {
        self.build_world().is_ok()
    }

    /// Prepare any backend: set gravity and add the scene.
    ///
    /// # Errors
    /// `SimulationFailure` if the backend rejects the scene.
    pub fn prepare_world<W: CollisionWorld + ?Sized>(&self, world: &mut W) -> Result<()> {
        world.set_gravity(Vec3::new(0.0, -self.config.gravity_sim(), 0.0));
        self.scene
            .populate(world, self.default_material(), &self.converter)?;
        Ok(())
    }

    /// Fresh rapier world with gravity and the scene's static bodies.
    ///
    /// # Errors
    /// `SimulationFailure` if the backend rejects the scene.
    pub fn build_world(&self) -> Result<RapierWorld> {
        let mut world = RapierWorld::new();
        self.prepare_world(&mut world)?;
        Ok(world)
    }

    /// Simulate one throw in a freshly built world.
    ///
    /// # Errors
    /// See [`simulate_throw`].
    pub fn simulate_throw(
        &self,
        start: &Vec3,
        pitch_deg: f32,
        yaw_deg: f32,
        throw_type: ThrowType,
        max_sim_seconds: f32,
    ) -> Result<(Vec<Vec3>, SimulationResult)> {
        let mut world = self.build_world()?;
        simulate_throw(
            &mut world,
            &self.config,
            &self.converter,
            start,
            pitch_deg,
            yaw_deg,
            throw_type,
            max_sim_seconds,
        )
    }

    /// Whether the straight segment between two game-space points is free
    /// of static geometry.
    ///
    /// # Errors
    /// `SimulationFailure` if the world cannot be built.
    pub fn line_of_sight(&self, from: &Vec3, to: &Vec3) -> Result<bool> {
        let world = self.build_world()?;
        let fraction = world.ray_test(&self.converter.to_sim(from), &self.converter.to_sim(to));
        Ok(fraction >= LINE_OF_SIGHT_CLEAR)
    }

    /// Search for throws landing near `target` with rapier worlds.
    ///
    /// # Errors
    /// `InvalidInput` for a non-finite target; per-candidate failures are
    /// dropped, not returned.
    pub fn find_solutions(
        &self,
        target: &Vec3,
        throw_type: ThrowType,
        strategy: SearchStrategy,
        max_results: usize,
    ) -> Result<Vec<SmokeSolution>> {
        let searcher = PositionSearcher::new(self, || self.build_world());
        searcher.find_solutions(target, throw_type, strategy, max_results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_builds_worlds() {
        let ctx = SimulationContext::with_test_scene().unwrap();
        assert!(ctx.is_initialized());

        let world = ctx.build_world().unwrap();
        assert_eq!(world.static_body_count(), ctx.scene().len());
        assert_eq!(world.dynamic_body_count(), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PhysicsConfig {
            units_per_meter: 0.0,
            ..Default::default()
        };
        let err = SimulationContext::new(config, SearchConfig::default(), Scene::flat_ground())
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_line_of_sight_over_flat_ground() {
        let ctx = SimulationContext::new(
            PhysicsConfig::default(),
            SearchConfig::default(),
            Scene::flat_ground(),
        )
        .unwrap();
        let a = Vec3::new(0.0, 0.0, 72.0);
        assert!(ctx.line_of_sight(&a, &Vec3::new(500.0, 300.0, 72.0)).unwrap());
        assert!(!ctx.line_of_sight(&a, &Vec3::new(500.0, 0.0, -100.0)).unwrap());
    }
}
