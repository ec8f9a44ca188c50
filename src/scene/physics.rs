//! Configuration constants for the per-tick motion integrator.

use cgmath::Vector3;

/// Physical constants used by a node's integration step.
///
/// Handed to [`SpatialNode`](super::SpatialNode) constructors so the motion
/// core never reads compile-time globals; tests can run a node under any
/// gravity they like.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsConfig {
    /// Constant gravitational acceleration in world space.
    pub gravity: Vector3<f32>,
    /// Coefficient of kinetic friction against the ground plane at y = 0.
    pub friction: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vector3::new(0.0, -38.0, 0.0),
            friction: 0.5,
        }
    }
}

impl PhysicsConfig {
    /// The baseline force every node carries: gravity scaled by its mass.
    pub fn baseline_force(&self, mass: f32) -> Vector3<f32> {
        self.gravity * mass
    }
}
