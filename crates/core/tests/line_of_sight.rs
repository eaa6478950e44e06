//! Line-of-sight queries through the simulation context

use smoke_sim_core::{
    PhysicsConfig, Scene, SearchConfig, SimulationContext, StaticGeometry, Vec3,
};

fn context_with(scene: Scene) -> SimulationContext {
    SimulationContext::new(PhysicsConfig::default(), SearchConfig::default(), scene).unwrap()
}

#[test]
fn test_clear_over_open_ground() {
    let ctx = context_with(Scene::flat_ground());
    assert!(ctx
        .line_of_sight(&Vec3::new(0.0, 0.0, 72.0), &Vec3::new(800.0, -300.0, 72.0))
        .unwrap());
}

#[test]
fn test_blocked_by_box() {
    let mut scene = Scene::flat_ground();
    scene.push(StaticGeometry::Cuboid {
        center: Vec3::new(200.0, 0.0, 64.0),
        half_extents: Vec3::new(16.0, 100.0, 64.0),
    });
    let ctx = context_with(scene);

    let eye = Vec3::new(0.0, 0.0, 72.0);
    assert!(!ctx.line_of_sight(&eye, &Vec3::new(400.0, 0.0, 72.0)).unwrap());
    // Over the top of the box
    assert!(ctx.line_of_sight(&eye, &Vec3::new(400.0, 0.0, 400.0)).unwrap());
    // Stops short of the box
    assert!(ctx.line_of_sight(&eye, &Vec3::new(150.0, 0.0, 72.0)).unwrap());
}

#[test]
fn test_zero_length_segment_is_clear() {
    let ctx = context_with(Scene::test_scene());
    let p = Vec3::new(500.0, 500.0, 72.0);
    assert!(ctx.line_of_sight(&p, &p).unwrap());
}
