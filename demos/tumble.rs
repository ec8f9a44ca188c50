//! # Tumble
//!
//! Scatters a dozen bodies above the ground plane and lets the integrator
//! take over: they free-fall, hit y = 0, and skid to a stop under ground
//! friction.
//!
//! ## Usage
//! ```bash
//! cargo run --example tumble
//! ```

use kelpie::prelude::*;
use rand::Rng;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut app = kelpie::default();

    let slab = app
        .registry_mut()
        .insert_geometry(&generate_plane(14.0, 14.0, 1, 1));
    let ball = app.registry_mut().insert_geometry(&generate_sphere(20, 12));
    let block = app.registry_mut().insert_geometry(&generate_cube());

    let mut floor = SpatialNode::new(vec![slab])?;
    floor.set_name("floor");
    floor.set_mass(0.0);
    floor.set_material(Vector4::new(0.15, 0.7, 0.05, 2.0));
    app.scene_mut().add_node(floor);

    let mut rng = rand::rng();
    for i in 0..12 {
        let mesh = if i % 2 == 0 { ball } else { block };
        let mut body = SpatialNode::new(vec![mesh])?;
        body.set_name(format!("body{i}"));
        body.set_position(Vector3::new(
            rng.random_range(-3.0..3.0),
            rng.random_range(2.0..7.0),
            rng.random_range(-3.0..3.0),
        ));
        body.set_scale(Vector3::new(0.35, 0.35, 0.35));
        // A horizontal shove so friction has something to chew on after
        // the drop.
        body.set_velocity(Vector3::new(
            rng.random_range(-4.0..4.0),
            0.0,
            rng.random_range(-4.0..4.0),
        ));
        app.scene_mut().add_node(body);
    }

    app.lights_mut()
        .add_point(PointLight::lamp(Vector3::new(0.0, 8.0, 2.0)));

    // Look down on the drop zone; the default camera sits level with the
    // floor and would see it edge on.
    app.camera_mut().eye = Point3::new(0.0, 6.0, 10.0);

    app.run();
    Ok(())
}
