//! Collision world abstraction
//!
//! The simulator needs very little from a rigid-body engine: create and
//! destroy bodies, advance time in fixed steps, read a body's position and
//! velocity back, and cast rays against the static map. This module defines
//! that capability as the `CollisionWorld` trait so any backend providing
//! these operations with the same semantics can be swapped in.
//!
//! All quantities crossing this trait are in **simulation space** (meters,
//! Y-up). Game-space conversion happens above it.
//!
//! # Backends
//!
//! - [`RapierWorld`]: the default, backed by `rapier3d`.
//!
//! # Scenes
//!
//! [`Scene`] describes map geometry in game space and knows how to populate
//! any `CollisionWorld` with it.

mod map_points;
mod obj;
mod rapier_world;
mod scene;

pub use map_points::{MapPoints, Team};
pub use rapier_world::RapierWorld;
pub use scene::{Scene, SceneObject};

use crate::core_types::vec3::Vec3;
use crate::physics::CoordinateConverter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque handle to a body owned by a `CollisionWorld`.
///
/// Handles are never reused within one world, so a stale handle is always
/// detected as `WorldError::UnknownBody`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(u64);

impl BodyHandle {
    /// Wrap a backend-assigned id
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Backend-assigned id
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Contact response properties attached to a body at creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMaterial {
    /// Coefficient of restitution (0 = dead stop, 1 = perfectly elastic)
    pub restitution: f32,
    /// Coulomb friction coefficient
    pub friction: f32,
}

impl SurfaceMaterial {
    /// Create a material
    pub const fn new(restitution: f32, friction: f32) -> Self {
        Self {
            restitution,
            friction,
        }
    }
}

/// Static geometry primitives.
///
/// The same enum is used in both spaces: `Scene` stores game-space geometry
/// and converts it with [`StaticGeometry::to_sim`] before handing it to a
/// world, which only ever sees sim-space geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StaticGeometry {
    /// Infinite plane; everything on the side opposite `normal` is solid
    HalfSpace {
        /// Any point on the plane
        point: Vec3,
        /// Outward normal (need not be normalized)
        normal: Vec3,
    },
    /// Axis-aligned box
    Cuboid {
        /// Box center
        center: Vec3,
        /// Half of the box size along each axis
        half_extents: Vec3,
    },
    /// Triangle soup (concave map mesh)
    TriMesh {
        /// Vertex positions
        vertices: Vec<Vec3>,
        /// Counter-clockwise triangles indexing `vertices`
        indices: Vec<[u32; 3]>,
    },
}

impl StaticGeometry {
    /// Convert game-space geometry to sim space.
    ///
    /// The up/forward swap mirrors the space, so triangle winding is
    /// reversed to keep outward faces outward.
    pub fn to_sim(&self, converter: &CoordinateConverter) -> StaticGeometry {
        match self {
            StaticGeometry::HalfSpace { point, normal } => StaticGeometry::HalfSpace {
                point: converter.to_sim(point),
                normal: converter.direction_to_sim(normal),
            },
            StaticGeometry::Cuboid {
                center,
                half_extents,
            } => StaticGeometry::Cuboid {
                center: converter.to_sim(center),
                half_extents: converter.to_sim(half_extents),
            },
            StaticGeometry::TriMesh { vertices, indices } => StaticGeometry::TriMesh {
                vertices: vertices.iter().map(|v| converter.to_sim(v)).collect(),
                indices: indices.iter().map(|&[a, b, c]| [a, c, b]).collect(),
            },
        }
    }

    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            StaticGeometry::HalfSpace { .. } => "half_space",
            StaticGeometry::Cuboid { .. } => "cuboid",
            StaticGeometry::TriMesh { .. } => "trimesh",
        }
    }
}

/// Parameters for a dynamic projectile sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereDesc {
    /// Initial center position (m)
    pub position: Vec3,
    /// Initial linear velocity (m/s)
    pub velocity: Vec3,
    /// Sphere radius (m)
    pub radius: f32,
    /// Mass (kg)
    pub mass: f32,
    /// Contact response
    pub material: SurfaceMaterial,
    /// Linear velocity damping
    pub linear_damping: f32,
    /// Angular velocity damping
    pub angular_damping: f32,
}

/// Errors raised by a collision world backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    /// Handle does not name a live body in this world
    #[error("unknown body handle {0}")]
    UnknownBody(u64),

    /// Operation needs a dynamic body but the handle names static geometry
    #[error("body {0} is not dynamic")]
    NotDynamic(u64),

    /// Geometry cannot be turned into a collider
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Body parameters are out of range
    #[error("invalid body parameters: {0}")]
    InvalidBody(String),

    /// The backend refused the operation
    #[error("physics backend error: {0}")]
    Backend(String),
}

/// Minimal rigid-body capability the trajectory simulator is written against.
///
/// Implementations must be deterministic: the same sequence of calls on a
/// freshly built world must give bit-identical results. Bodies are only
/// touched from one thread at a time; parallel callers build one world each.
pub trait CollisionWorld {
    /// Set the constant gravity acceleration (m/s²)
    fn set_gravity(&mut self, gravity: Vec3);

    /// Add immovable map geometry
    fn create_static_body(
        &mut self,
        geometry: &StaticGeometry,
        material: SurfaceMaterial,
    ) -> Result<BodyHandle, WorldError>;

    /// Add a dynamic sphere with an initial velocity
    fn create_dynamic_sphere(&mut self, desc: &SphereDesc) -> Result<BodyHandle, WorldError>;

    /// Remove a body (static or dynamic)
    fn destroy_body(&mut self, handle: BodyHandle) -> Result<(), WorldError>;

    /// Advance the world by one fixed step, resolving contacts and damping
    fn step(&mut self, time_step: f32) -> Result<(), WorldError>;

    /// Current center position of a dynamic body (m)
    fn position(&self, handle: BodyHandle) -> Result<Vec3, WorldError>;

    /// Current linear velocity of a dynamic body (m/s)
    fn velocity(&self, handle: BodyHandle) -> Result<Vec3, WorldError>;

    /// Cast a segment from `from` to `to` against static geometry.
    ///
    /// Returns the fraction of the segment travelled before the first hit,
    /// in `[0, 1]`; `1.0` means nothing was hit.
    fn ray_test(&self, from: &Vec3, to: &Vec3) -> f32;

    /// Number of live static bodies
    fn static_body_count(&self) -> usize;

    /// Number of live dynamic bodies
    fn dynamic_body_count(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::PhysicsConfig;
    use approx::assert_relative_eq;

    #[test]
    fn test_geometry_to_sim_swaps_axes() {
        let conv = CoordinateConverter::new(&PhysicsConfig {
            units_per_meter: 10.0,
            ..Default::default()
        });

        let floor = StaticGeometry::HalfSpace {
            point: Vec3::new(0.0, 0.0, 10.0),
            normal: Vec3::z(),
        };
        match floor.to_sim(&conv) {
            StaticGeometry::HalfSpace { point, normal } => {
                assert_relative_eq!(point, Vec3::new(0.0, 1.0, 0.0));
                assert_eq!(normal, Vec3::y());
            }
            other => panic!("unexpected geometry {other:?}"),
        }

        let boxed = StaticGeometry::Cuboid {
            center: Vec3::new(10.0, 20.0, 30.0),
            half_extents: Vec3::new(1.0, 2.0, 3.0),
        };
        match boxed.to_sim(&conv) {
            StaticGeometry::Cuboid {
                center,
                half_extents,
            } => {
                assert_relative_eq!(center, Vec3::new(1.0, 3.0, 2.0));
                assert_relative_eq!(half_extents, Vec3::new(0.1, 0.3, 0.2));
            }
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn test_trimesh_winding_reversed() {
        let conv = CoordinateConverter::default();
        let mesh = StaticGeometry::TriMesh {
            vertices: vec![Vec3::zeros(), Vec3::x(), Vec3::y()],
            indices: vec![[0, 1, 2]],
        };
        match mesh.to_sim(&conv) {
            StaticGeometry::TriMesh { indices, .. } => assert_eq!(indices, vec![[0, 2, 1]]),
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn test_geometry_json_tagged() {
        let json = r#"{"type":"cuboid","center":[0.0,0.0,8.0],"half_extents":[8.0,8.0,8.0]}"#;
        let geometry: StaticGeometry = serde_json::from_str(json).unwrap();
        assert_eq!(geometry.kind(), "cuboid");
    }
}
