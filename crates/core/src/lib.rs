//! Smoke Grenade Lineup Finder Core Library
//!
//! Finds where a player should stand and aim so that a thrown smoke grenade
//! lands near a chosen target. Throws are simulated as rigid-body spheres
//! with gravity, damping, bounces and friction against static map geometry,
//! then ranked by how close they land.
//!
//! ## Coordinate spaces
//!
//! - **Game space**: units (1 unit = 1 inch), X east, Y north, Z up. Every
//!   public position, speed and command string uses it.
//! - **Sim space**: meters, Y up. Only the physics backend sees it; the
//!   [`CoordinateConverter`] is the single bridge.
//!
//! ## Layout
//!
//! - [`world`]: the [`CollisionWorld`] capability, the rapier backend and
//!   game-space [`Scene`] geometry
//! - [`simulation`]: single-throw simulation and the [`SimulationContext`]
//! - [`search`]: the parallel grid search and ranked [`SmokeSolution`]s
//! - [`request`]: JSON request/response surface and health probe
//!
//! ## Example
//!
//! ```no_run
//! use smoke_sim_core::{SearchStrategy, SimulationContext, ThrowType, Vec3};
//!
//! let ctx = SimulationContext::with_test_scene()?;
//! let smokes = ctx.find_solutions(
//!     &Vec3::new(500.0, 500.0, 50.0),
//!     ThrowType::Strong,
//!     SearchStrategy::Grid,
//!     5,
//! )?;
//! for smoke in &smokes {
//!     println!("{:.1}: {}", smoke.accuracy, smoke.cs2_commands.combined);
//! }
//! # Ok::<(), smoke_sim_core::SmokeError>(())
//! ```

// Core types and utilities
pub mod core_types;

pub mod physics;
pub mod request;
pub mod search;
pub mod simulation;
pub mod world;

// Re-export core types
pub use core_types::{
    horizontal_distance, vec3_from_slice, GameUnits, Meters, Result, SmokeError, ThrowType, Vec3,
};

pub use physics::{
    angle_between, clamp_angle, direction_from_angles, normalize_angle, optimal_pitch,
    yaw_towards, CoordinateConverter, PhysicsConfig, ThrowSpeeds,
};
pub use request::{handle_request, health, HealthStatus, SmokeRequest, SmokeResponse};
pub use search::{
    Angles, ConsoleCommands, PositionSearcher, SearchConfig, SearchStrategy, SmokeSolution,
};
pub use simulation::{
    resample_trajectory, simulate_throw, SimulationContext, SimulationResult, TrajectoryMetrics,
    LINE_OF_SIGHT_CLEAR,
};
pub use world::{
    BodyHandle, CollisionWorld, MapPoints, RapierWorld, Scene, SceneObject, SphereDesc,
    StaticGeometry, SurfaceMaterial, Team, WorldError,
};
