//! `rapier3d` backed collision world
//!
//! Static map geometry becomes parent-less fixed colliders; projectiles
//! become dynamic rigid bodies with a single ball collider and continuous
//! collision detection enabled, since a full-strength throw covers about
//! twice the grenade radius every step.

use super::{BodyHandle, CollisionWorld, SphereDesc, StaticGeometry, SurfaceMaterial, WorldError};
use crate::core_types::vec3::Vec3;
use rapier3d::na::Unit;
use rapier3d::prelude::*;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

/// Rapier body behind one of our handles
#[derive(Debug, Clone, Copy)]
enum RapierBody {
    Static(ColliderHandle),
    Dynamic(RigidBodyHandle),
}

#[inline]
fn to_rapier(v: &Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

#[inline]
fn from_rapier(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn check_finite(label: &str, v: &Vec3) -> Result<(), WorldError> {
    if v.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(WorldError::InvalidGeometry(format!(
            "{label} must be finite, got [{}, {}, {}]",
            v.x, v.y, v.z
        )))
    }
}

/// Collision world running on the rapier physics pipeline.
pub struct RapierWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,

    bodies: FxHashMap<u64, RapierBody>,
    next_id: u64,
    static_count: usize,
    dynamic_count: usize,
}

impl RapierWorld {
    /// Create an empty world with zero gravity
    pub fn new() -> Self {
        Self {
            gravity: Vector::zeros(),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            bodies: FxHashMap::default(),
            next_id: 1,
            static_count: 0,
            dynamic_count: 0,
        }
    }

    fn register(&mut self, body: RapierBody) -> BodyHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.bodies.insert(id, body);
        match body {
            RapierBody::Static(_) => self.static_count += 1,
            RapierBody::Dynamic(_) => self.dynamic_count += 1,
        }
        BodyHandle::new(id)
    }

    fn dynamic_body(&self, handle: BodyHandle) -> Result<&RigidBody, WorldError> {
        match self.bodies.get(&handle.id()) {
            Some(RapierBody::Dynamic(h)) => self
                .rigid_body_set
                .get(*h)
                .ok_or(WorldError::UnknownBody(handle.id())),
            Some(RapierBody::Static(_)) => Err(WorldError::NotDynamic(handle.id())),
            None => Err(WorldError::UnknownBody(handle.id())),
        }
    }

    fn collider_builder(geometry: &StaticGeometry) -> Result<ColliderBuilder, WorldError> {
        match geometry {
            StaticGeometry::HalfSpace { point, normal } => {
                check_finite("half-space point", point)?;
                check_finite("half-space normal", normal)?;
                if normal.norm_squared() <= f32::EPSILON {
                    return Err(WorldError::InvalidGeometry(
                        "half-space normal must be non-zero".to_string(),
                    ));
                }
                Ok(ColliderBuilder::halfspace(Unit::new_normalize(to_rapier(normal)))
                    .translation(to_rapier(point)))
            }
            StaticGeometry::Cuboid {
                center,
                half_extents,
            } => {
                check_finite("cuboid center", center)?;
                check_finite("cuboid half extents", half_extents)?;
                if half_extents.iter().any(|&h| h <= 0.0) {
                    return Err(WorldError::InvalidGeometry(format!(
                        "cuboid half extents must be positive, got [{}, {}, {}]",
                        half_extents.x, half_extents.y, half_extents.z
                    )));
                }
                Ok(
                    ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
                        .translation(to_rapier(center)),
                )
            }
            StaticGeometry::TriMesh { vertices, indices } => {
                if vertices.is_empty() || indices.is_empty() {
                    return Err(WorldError::InvalidGeometry(
                        "triangle mesh needs at least one triangle".to_string(),
                    ));
                }
                let vertex_count = vertices.len();
                if let Some(bad) = indices
                    .iter()
                    .flatten()
                    .find(|&&i| i as usize >= vertex_count)
                {
                    return Err(WorldError::InvalidGeometry(format!(
                        "triangle index {bad} out of range for {vertex_count} vertices"
                    )));
                }
                for v in vertices {
                    check_finite("mesh vertex", v)?;
                }
                let points: Vec<Point<Real>> =
                    vertices.iter().map(|v| point![v.x, v.y, v.z]).collect();
                Ok(ColliderBuilder::new(SharedShape::trimesh(
                    points,
                    indices.clone(),
                )))
            }
        }
    }
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionWorld for RapierWorld {
    fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = to_rapier(&gravity);
    }

    fn create_static_body(
        &mut self,
        geometry: &StaticGeometry,
        material: SurfaceMaterial,
    ) -> Result<BodyHandle, WorldError> {
        let collider = Self::collider_builder(geometry)?
            .restitution(material.restitution)
            .friction(material.friction)
            .build();
        let collider_handle = self.collider_set.insert(collider);
        self.query_pipeline.update(&self.collider_set);

        let handle = self.register(RapierBody::Static(collider_handle));
        debug!(
            "Static {} body {} added ({} static total)",
            geometry.kind(),
            handle.id(),
            self.static_count
        );
        Ok(handle)
    }

    fn create_dynamic_sphere(&mut self, desc: &SphereDesc) -> Result<BodyHandle, WorldError> {
        if !(desc.radius.is_finite() && desc.radius > 0.0) {
            return Err(WorldError::InvalidBody(format!(
                "sphere radius must be positive, got {}",
                desc.radius
            )));
        }
        if !(desc.mass.is_finite() && desc.mass > 0.0) {
            return Err(WorldError::InvalidBody(format!(
                "sphere mass must be positive, got {}",
                desc.mass
            )));
        }
        check_finite("sphere position", &desc.position)
            .and_then(|()| check_finite("sphere velocity", &desc.velocity))
            .map_err(|e| WorldError::InvalidBody(e.to_string()))?;

        let body = RigidBodyBuilder::dynamic()
            .translation(to_rapier(&desc.position))
            .linvel(to_rapier(&desc.velocity))
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .ccd_enabled(true)
            .build();
        let body_handle = self.rigid_body_set.insert(body);

        let collider = ColliderBuilder::ball(desc.radius)
            .mass(desc.mass)
            .restitution(desc.material.restitution)
            .friction(desc.material.friction)
            .build();
        self.collider_set
            .insert_with_parent(collider, body_handle, &mut self.rigid_body_set);

        let handle = self.register(RapierBody::Dynamic(body_handle));
        trace!("Dynamic sphere {} created at {:?}", handle.id(), desc.position);
        Ok(handle)
    }

    fn destroy_body(&mut self, handle: BodyHandle) -> Result<(), WorldError> {
        let body = self
            .bodies
            .remove(&handle.id())
            .ok_or(WorldError::UnknownBody(handle.id()))?;

        match body {
            RapierBody::Static(collider_handle) => {
                self.collider_set.remove(
                    collider_handle,
                    &mut self.island_manager,
                    &mut self.rigid_body_set,
                    true,
                );
                self.static_count -= 1;
            }
            RapierBody::Dynamic(body_handle) => {
                self.rigid_body_set.remove(
                    body_handle,
                    &mut self.island_manager,
                    &mut self.collider_set,
                    &mut self.impulse_joint_set,
                    &mut self.multibody_joint_set,
                    true,
                );
                self.dynamic_count -= 1;
            }
        }
        self.query_pipeline.update(&self.collider_set);

        trace!("Body {} destroyed", handle.id());
        Ok(())
    }

    fn step(&mut self, time_step: f32) -> Result<(), WorldError> {
        if !(time_step.is_finite() && time_step > 0.0) {
            return Err(WorldError::Backend(format!(
                "time step must be positive, got {time_step}"
            )));
        }

        self.integration_parameters.dt = time_step;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
        Ok(())
    }

    fn position(&self, handle: BodyHandle) -> Result<Vec3, WorldError> {
        self.dynamic_body(handle)
            .map(|body| from_rapier(body.translation()))
    }

    fn velocity(&self, handle: BodyHandle) -> Result<Vec3, WorldError> {
        self.dynamic_body(handle).map(|body| from_rapier(body.linvel()))
    }

    fn ray_test(&self, from: &Vec3, to: &Vec3) -> f32 {
        let segment = to - from;
        if segment.norm_squared() <= f32::EPSILON {
            return 1.0;
        }

        // Direction is the unnormalized segment, so time of impact is
        // already the travelled fraction.
        let ray = Ray::new(point![from.x, from.y, from.z], to_rapier(&segment));
        self.query_pipeline
            .cast_ray(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                1.0,
                true,
                QueryFilter::only_fixed(),
            )
            .map_or(1.0, |(_, toi)| toi.clamp(0.0, 1.0))
    }

    fn static_body_count(&self) -> usize {
        self.static_count
    }

    fn dynamic_body_count(&self) -> usize {
        self.dynamic_count
    }
}
