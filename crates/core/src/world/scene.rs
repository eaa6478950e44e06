//! Static map geometry in game space
//!
//! A `Scene` is plain data: it can be shared read-only between search
//! workers and replayed into as many collision worlds as needed.

use super::obj::parse_obj;
use super::{BodyHandle, CollisionWorld, StaticGeometry, SurfaceMaterial};
use crate::core_types::error::{Result, SmokeError};
use crate::core_types::vec3::Vec3;
use crate::physics::CoordinateConverter;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// One piece of static geometry with an optional material override
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Game-space geometry
    pub geometry: StaticGeometry,
    /// Overrides the world's default surface when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<SurfaceMaterial>,
}

impl SceneObject {
    /// Geometry using the default surface material
    pub fn new(geometry: StaticGeometry) -> Self {
        Self {
            geometry,
            material: None,
        }
    }
}

/// Static map geometry in game space (units, Z-up)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Scene name for logging
    #[serde(default)]
    pub name: String,
    /// Static objects
    pub objects: Vec<SceneObject>,
}

/// Game units per meter used to lay out the built-in test scene
const TEST_SCENE_SCALE: f32 = 39.37;

impl Scene {
    /// Infinite floor at z = 0 and nothing else
    pub fn flat_ground() -> Self {
        Self {
            name: "flat_ground".to_string(),
            objects: vec![SceneObject::new(StaticGeometry::HalfSpace {
                point: Vec3::zeros(),
                normal: Vec3::z(),
            })],
        }
    }

    /// Floor plus a handful of box obstacles around the origin.
    ///
    /// Obstacles are laid out in meters (center, half extents) and scaled
    /// into game units.
    pub fn test_scene() -> Self {
        // Older tooling fed these same numbers in as game units, giving
        // obstacles 1/39 of this size; meters keep them wall-sized.
        let obstacles: [([f32; 3], [f32; 3]); 4] = [
            // wall
            ([5.0, 0.0, 1.5], [2.0, 0.2, 3.0]),
            // wall
            ([-5.0, 5.0, 2.0], [0.8, 3.0, 4.0]),
            // crate
            ([0.0, -3.0, 0.5], [1.0, 1.0, 1.0]),
            // platform
            ([3.0, 4.0, 1.0], [1.5, 1.5, 0.2]),
        ];

        let mut scene = Self::flat_ground();
        scene.name = "test_scene".to_string();
        scene
            .objects
            .extend(obstacles.iter().map(|&(center, half_extents)| {
                SceneObject::new(StaticGeometry::Cuboid {
                    center: Vec3::from(center) * TEST_SCENE_SCALE,
                    half_extents: Vec3::from(half_extents) * TEST_SCENE_SCALE,
                })
            }));
        scene
    }

    /// Number of static objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene has no geometry at all
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Append one object
    pub fn push(&mut self, geometry: StaticGeometry) {
        self.objects.push(SceneObject::new(geometry));
    }

    /// Load a scene serialized as JSON.
    ///
    /// # Errors
    /// `SceneLoad` if the file cannot be read or parsed.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SmokeError::scene_load(format!("cannot read {}: {e}", path.display())))?;
        let mut scene: Self = serde_json::from_str(&contents)
            .map_err(|e| SmokeError::scene_load(format!("cannot parse {}: {e}", path.display())))?;
        if scene.name.is_empty() {
            scene.name = file_stem(path);
        }
        Ok(scene)
    }

    /// Load a collision mesh from a Wavefront OBJ file with game-space
    /// vertices. A floor is not added; the mesh is the whole map.
    ///
    /// # Errors
    /// `SceneLoad` if the file cannot be read or holds no valid faces.
    pub fn from_obj_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SmokeError::scene_load(format!("cannot read {}: {e}", path.display())))?;
        let mesh = parse_obj(&contents).map_err(|e| match e {
            SmokeError::SceneLoad(msg) => {
                SmokeError::scene_load(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;

        debug!(
            "Read {} vertices, {} triangles from {}",
            mesh.vertices.len(),
            mesh.indices.len(),
            path.display()
        );

        Ok(Self {
            name: file_stem(path),
            objects: vec![SceneObject::new(StaticGeometry::TriMesh {
                vertices: mesh.vertices,
                indices: mesh.indices,
            })],
        })
    }

    /// Find map geometry for `name` under `dir`.
    ///
    /// Tries `<name>.json`, `<name>_collision.obj`, then `<name>.obj`. When
    /// none exists, or the first one found fails to load, falls back to
    /// [`Scene::test_scene`].
    pub fn load_map<P: AsRef<Path>>(dir: P, name: &str) -> Self {
        let dir = dir.as_ref();
        let candidates = [
            format!("{name}.json"),
            format!("{name}_collision.obj"),
            format!("{name}.obj"),
        ];

        let found = candidates
            .iter()
            .map(|file| dir.join(file))
            .find(|path| path.is_file());

        let Some(path) = found else {
            warn!(
                "No geometry for map '{}' in {}, using test scene",
                name,
                dir.display()
            );
            return Self::test_scene();
        };

        let loaded = if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_file(&path)
        } else {
            Self::from_obj_file(&path)
        };

        match loaded {
            Ok(scene) => {
                info!(
                    "Loaded map '{}' from {} ({} objects)",
                    name,
                    path.display(),
                    scene.len()
                );
                scene
            }
            Err(e) => {
                warn!("{e}; using test scene");
                Self::test_scene()
            }
        }
    }

    /// Create every object as a static body in `world`.
    ///
    /// On failure the bodies already created are destroyed again so the
    /// world is left as it was found.
    ///
    /// # Errors
    /// `SimulationFailure` if the world rejects a piece of geometry.
    pub fn populate<W: CollisionWorld + ?Sized>(
        &self,
        world: &mut W,
        default_material: SurfaceMaterial,
        converter: &CoordinateConverter,
    ) -> Result<Vec<BodyHandle>> {
        let mut handles = Vec::with_capacity(self.objects.len());
        for object in &self.objects {
            let geometry = object.geometry.to_sim(converter);
            let material = object.material.unwrap_or(default_material);
            match world.create_static_body(&geometry, material) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    for handle in handles {
                        // Already failing; a second error here adds nothing
                        let _ = world.destroy_body(handle);
                    }
                    return Err(e.into());
                }
            }
        }
        Ok(handles)
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
