//! # Voyage
//!
//! A raft adrift at midnight. The raft owns a mast and a passenger as child
//! nodes, so the whole assembly turns as one while a second animator rolls
//! the passenger about its own axis.
//!
//! Shows parent/child transform composition, two animators running at once,
//! and a light rig with a faint directional plus one warm lamp overhead.
//!
//! ## Usage
//! ```bash
//! cargo run --example voyage
//! ```

use std::f32::consts::TAU;

use kelpie::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut app = kelpie::default();

    let hull = app.registry_mut().insert_geometry(&generate_cube());
    let spar = app
        .registry_mut()
        .insert_geometry(&generate_cylinder(0.06, 1.4, 16));
    let ball = app.registry_mut().insert_geometry(&generate_sphere(24, 16));

    // The raft rests on the water plane at y = 0; the default mass keeps it
    // pinned there while everything else rides along.
    let mut raft = SpatialNode::new(vec![hull])?;
    raft.set_name("raft");

    let mut mast = SpatialNode::new(vec![spar])?;
    mast.set_name("mast");
    mast.set_position(Vector3::new(-0.25, 1.2, 0.0));
    // Children integrate in parent space; zero mass exempts the riders
    // from free fall.
    mast.set_mass(0.0);

    let mut passenger = SpatialNode::new(vec![ball])?;
    passenger.set_name("passenger");
    passenger.set_position(Vector3::new(0.3, 0.75, 0.2));
    passenger.set_scale(Vector3::new(0.25, 0.25, 0.25));
    passenger.set_mass(0.0);
    passenger.set_material(Vector4::new(0.1, 1.0, 0.8, 32.0));

    raft.add_child(mast);
    let passenger_id = raft.add_child(passenger);
    let raft_id = app.scene_mut().add_node(raft);

    // Midnight lighting: barely-there directional, one lamp high overhead.
    app.lights_mut().directional = DirectionalLight {
        direction: Vector3::new(10.0, -1.0, 0.0),
        ambient: Vector3::new(0.05, 0.05, 0.05),
        diffuse: Vector3::new(0.0, 0.0, 0.0),
        specular: Vector3::new(0.05, 0.05, 0.05),
    };
    app.lights_mut()
        .add_point(PointLight::lamp(Vector3::new(0.0, 20.0, 0.0)));

    // One full turn of the raft every ten seconds; the passenger rolls
    // about its own z axis at the same rate.
    let mut drift = Animator::new();
    drift.add_animation(Animation::rotation(
        raft_id,
        10.0,
        Vector3::new(0.0, TAU, 0.0),
    )?);
    let mut roll = Animator::new();
    roll.add_animation(Animation::rotation(
        passenger_id,
        10.0,
        Vector3::new(0.0, 0.0, TAU),
    )?);
    app.scene_mut().add_animator(drift);
    app.scene_mut().add_animator(roll);
    app.scene_mut().start_animators();

    app.run();
    Ok(())
}
