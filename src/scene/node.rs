//! Scene graph nodes with rigid-body motion state.
//!
//! A [`SpatialNode`] owns its children outright, so a graph is always a
//! forest of trees and a cycle is unrepresentable. Nodes are addressed
//! across the graph by [`NodeId`], a token minted once at construction and
//! never reused.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use cgmath::{ElementWise, InnerSpace, Matrix4, Rad, SquareMatrix, Vector3, Vector4, Zero};

use super::physics::PhysicsConfig;
use super::{MeshHandle, SceneError};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Horizontal speeds below this count as standing still for friction.
const REST_SPEED: f32 = 1e-4;

/// Stable identity of a node, unique for the lifetime of the process.
///
/// Ids survive reparenting and scene insertion, which makes them safe to
/// hold in animations and across frames. [`SpatialNode::duplicate`] mints
/// fresh ids for the copied subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Sink for the draw commands produced by a scene graph walk.
///
/// The graph publishes plain matrices and material vectors through this
/// trait, so the motion core compiles and tests without a GPU attached.
/// The engine's draw list implements it for real frames; tests implement
/// it with a recording stub.
pub trait SceneRenderer {
    /// Sets the model matrix applied to subsequent primitive draws.
    fn set_model_matrix(&mut self, matrix: Matrix4<f32>);

    /// Sets the material coefficients applied to subsequent primitive draws.
    ///
    /// Layout is `(ambient, diffuse, specular, shininess)`.
    fn set_material(&mut self, material: Vector4<f32>);

    /// Draws one primitive under the current matrix and material.
    fn draw_primitive(&mut self, primitive: MeshHandle);
}

/// A node in the scene graph: geometry, a local transform, and the motion
/// state the integrator advances every tick.
///
/// There is no `Clone` impl. Duplicating a subtree by accident would alias
/// mesh handles silently and reuse ids, so copies go through
/// [`SpatialNode::duplicate`], which is explicit about minting new ids.
pub struct SpatialNode {
    id: NodeId,
    name: Option<String>,
    primitives: Vec<MeshHandle>,
    children: Vec<SpatialNode>,

    position: Vector3<f32>,
    /// Euler angles in radians, applied in Z, X, Y order.
    orientation: Vector3<f32>,
    scale: Vector3<f32>,
    /// Pivot for rotation and scaling, in local coordinates.
    center: Vector3<f32>,
    /// Import-time correction baked under the dynamic transform.
    base_transform: Matrix4<f32>,
    /// Phong coefficients `(ambient, diffuse, specular, shininess)`.
    material: Vector4<f32>,

    velocity: Vector3<f32>,
    acceleration: Vector3<f32>,
    angular_velocity: Vector3<f32>,
    angular_acceleration: Vector3<f32>,
    mass: f32,
    forces: Vec<Vector3<f32>>,
    physics: PhysicsConfig,

    /// Local transform as of the last tick, reused by rendering.
    model_matrix: Matrix4<f32>,
}

impl SpatialNode {
    /// Creates a node over the given primitives with default physics.
    ///
    /// Nodes start at the origin with unit scale, mass 1 and the default
    /// material. The force accumulator carries the gravity term from birth.
    pub fn new(primitives: Vec<MeshHandle>) -> Result<Self, SceneError> {
        Self::with_config(primitives, Matrix4::identity(), PhysicsConfig::default())
    }

    /// Creates a node whose geometry needs a fixed correction, typically an
    /// import-time scale or recentering. The correction is applied before
    /// the node's own transform and is never touched by animation.
    pub fn with_base_transform(
        primitives: Vec<MeshHandle>,
        base_transform: Matrix4<f32>,
    ) -> Result<Self, SceneError> {
        Self::with_config(primitives, base_transform, PhysicsConfig::default())
    }

    /// Creates a node under explicit physics constants.
    ///
    /// Returns [`SceneError::EmptyPrimitives`] when `primitives` is empty;
    /// a node exists to be drawn.
    pub fn with_config(
        primitives: Vec<MeshHandle>,
        base_transform: Matrix4<f32>,
        physics: PhysicsConfig,
    ) -> Result<Self, SceneError> {
        if primitives.is_empty() {
            return Err(SceneError::EmptyPrimitives);
        }
        let mass = 1.0;
        let mut node = Self {
            id: NodeId::next(),
            name: None,
            primitives,
            children: Vec::new(),
            position: Vector3::zero(),
            orientation: Vector3::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            center: Vector3::zero(),
            base_transform,
            material: Vector4::new(0.1, 1.0, 0.3, 4.0),
            velocity: Vector3::zero(),
            acceleration: Vector3::zero(),
            angular_velocity: Vector3::zero(),
            angular_acceleration: Vector3::zero(),
            mass,
            forces: vec![physics.baseline_force(mass)],
            physics,
            model_matrix: Matrix4::identity(),
        };
        node.model_matrix = node.local_transform();
        Ok(node)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn primitives(&self) -> &[MeshHandle] {
        &self.primitives
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
    }

    pub fn orientation(&self) -> Vector3<f32> {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Vector3<f32>) {
        self.orientation = orientation;
    }

    pub fn scale(&self) -> Vector3<f32> {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vector3<f32>) {
        self.scale = scale;
    }

    pub fn center(&self) -> Vector3<f32> {
        self.center
    }

    pub fn set_center(&mut self, center: Vector3<f32>) {
        self.center = center;
    }

    pub fn material(&self) -> Vector4<f32> {
        self.material
    }

    pub fn set_material(&mut self, material: Vector4<f32>) {
        self.material = material;
    }

    pub fn velocity(&self) -> Vector3<f32> {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vector3<f32>) {
        self.velocity = velocity;
    }

    pub fn acceleration(&self) -> Vector3<f32> {
        self.acceleration
    }

    pub fn set_acceleration(&mut self, acceleration: Vector3<f32>) {
        self.acceleration = acceleration;
    }

    pub fn angular_velocity(&self) -> Vector3<f32> {
        self.angular_velocity
    }

    pub fn set_angular_velocity(&mut self, angular_velocity: Vector3<f32>) {
        self.angular_velocity = angular_velocity;
    }

    pub fn angular_acceleration(&self) -> Vector3<f32> {
        self.angular_acceleration
    }

    pub fn set_angular_acceleration(&mut self, angular_acceleration: Vector3<f32>) {
        self.angular_acceleration = angular_acceleration;
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Changes the node's mass and rebuilds the force accumulator, since
    /// the baseline gravity term scales with mass.
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
        self.clear_forces();
    }

    pub fn forces(&self) -> &[Vector3<f32>] {
        &self.forces
    }

    /// Accumulates a force for the next tick.
    pub fn add_force(&mut self, force: Vector3<f32>) {
        self.forces.push(force);
    }

    /// Resets the force accumulator to the baseline gravity term alone.
    pub fn clear_forces(&mut self) {
        self.forces.clear();
        self.forces.push(self.physics.baseline_force(self.mass));
    }

    /// Moves the node by `offset` in parent space.
    pub fn translate(&mut self, offset: Vector3<f32>) {
        self.position += offset;
    }

    /// Adds `rotation` (radians) to the node's Euler angles.
    pub fn rotate(&mut self, rotation: Vector3<f32>) {
        self.orientation += rotation;
    }

    /// Multiplies the node's scale element-wise by `growth`.
    pub fn grow(&mut self, growth: Vector3<f32>) {
        self.scale = self.scale.mul_element_wise(growth);
    }

    /// Transfers ownership of `child` into this node and returns its id so
    /// callers can keep addressing it after the move.
    pub fn add_child(&mut self, child: SpatialNode) -> NodeId {
        let id = child.id;
        self.children.push(child);
        id
    }

    pub fn children(&self) -> &[SpatialNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [SpatialNode] {
        &mut self.children
    }

    /// Direct child by insertion index. Panics when out of range, which is
    /// a programming error in scene assembly.
    pub fn child(&self, index: usize) -> &SpatialNode {
        &self.children[index]
    }

    pub fn child_mut(&mut self, index: usize) -> &mut SpatialNode {
        &mut self.children[index]
    }

    /// Depth-first search of this subtree for `id`.
    pub fn find(&self, id: NodeId) -> Option<&SpatialNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Mutable variant of [`SpatialNode::find`].
    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut SpatialNode> {
        if self.id == id {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_mut(id))
    }

    /// Deep copy of this subtree with fresh ids throughout.
    ///
    /// Everything else, motion state included, is copied verbatim.
    pub fn duplicate(&self) -> SpatialNode {
        SpatialNode {
            id: NodeId::next(),
            name: self.name.clone(),
            primitives: self.primitives.clone(),
            children: self.children.iter().map(SpatialNode::duplicate).collect(),
            position: self.position,
            orientation: self.orientation,
            scale: self.scale,
            center: self.center,
            base_transform: self.base_transform,
            material: self.material,
            velocity: self.velocity,
            acceleration: self.acceleration,
            angular_velocity: self.angular_velocity,
            angular_acceleration: self.angular_acceleration,
            mass: self.mass,
            forces: self.forces.clone(),
            physics: self.physics,
            model_matrix: self.model_matrix,
        }
    }

    /// Composes the node's local transform.
    ///
    /// Factors apply right to left: base transform, then uncentering,
    /// scale, rotation about Z, X and Y in that order, re-centering scaled
    /// by the node's scale, and finally translation. The fixed Z, X, Y
    /// rotation order is part of the tuning of every demo scene; changing
    /// it changes what existing orientations mean.
    pub fn local_transform(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_translation(self.center.mul_element_wise(self.scale))
            * Matrix4::from_angle_z(Rad(self.orientation.z))
            * Matrix4::from_angle_x(Rad(self.orientation.x))
            * Matrix4::from_angle_y(Rad(self.orientation.y))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
            * Matrix4::from_translation(-self.center)
            * self.base_transform
    }

    /// Local transform as of the last [`SpatialNode::tick`].
    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.model_matrix
    }

    /// Advances motion by `dt` seconds, then ticks the children.
    ///
    /// The step order is load-bearing. Ground contact forces go in before
    /// the accumulator is summed, the accumulator resets to baseline every
    /// tick so applied forces last exactly one tick, and the position is
    /// clamped to the ground plane after integration.
    pub fn tick(&mut self, dt: f32) {
        if self.position.y == 0.0 {
            let horizontal = Vector3::new(self.velocity.x, 0.0, self.velocity.z);
            if horizontal.magnitude2() > REST_SPEED * REST_SPEED {
                let magnitude = self.physics.friction * self.physics.gravity.y.abs() * self.mass;
                self.add_force(-horizontal.normalize() * magnitude);
            } else {
                // At rest the leftover horizontal terms would jitter the
                // node, so the accumulator goes back to baseline instead.
                self.clear_forces();
            }
            // Normal force from the ground, equal and opposite to gravity.
            self.add_force(-self.physics.baseline_force(self.mass));
        }

        let net_force = self
            .forces
            .iter()
            .copied()
            .fold(Vector3::zero(), |net, force| net + force);
        if self.mass > 0.0 {
            self.acceleration = net_force / self.mass;
        }
        self.clear_forces();

        if self.position.y < 0.0 && self.mass != 0.0 {
            self.position.y = 0.0;
        }

        self.velocity += self.acceleration * dt;
        self.position += self.velocity * dt;
        if self.position.y < 0.0 {
            self.position.y = 0.0;
        }

        self.model_matrix = self.local_transform();

        for child in &mut self.children {
            child.tick(dt);
        }
    }

    /// Walks the subtree and emits one draw per primitive, parent before
    /// children, composing transforms down the tree.
    pub fn render(&self, renderer: &mut dyn SceneRenderer) {
        self.render_with_ambient(renderer, Matrix4::identity());
    }

    /// [`SpatialNode::render`] under an explicit inherited transform.
    pub fn render_with_ambient(&self, renderer: &mut dyn SceneRenderer, ambient: Matrix4<f32>) {
        let model = ambient * self.local_transform();
        renderer.set_model_matrix(model);
        renderer.set_material(self.material);
        for primitive in &self.primitives {
            renderer.draw_primitive(*primitive);
        }
        for child in &self.children {
            child.render_with_ambient(renderer, model);
        }
    }
}

impl fmt::Debug for SpatialNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialNode")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("position", &self.position)
            .field("children", &self.children.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_node() -> SpatialNode {
        SpatialNode::new(vec![MeshHandle(0)]).unwrap()
    }

    fn assert_vec3_near(actual: Vector3<f32>, expected: Vector3<f32>, tolerance: f32) {
        let delta = actual - expected;
        assert!(
            delta.magnitude() <= tolerance,
            "expected {expected:?}, got {actual:?}"
        );
    }

    fn assert_mat4_near(actual: Matrix4<f32>, expected: Matrix4<f32>) {
        let a: &[f32; 16] = actual.as_ref();
        let e: &[f32; 16] = expected.as_ref();
        for (index, (lhs, rhs)) in a.iter().zip(e.iter()).enumerate() {
            assert!(
                (lhs - rhs).abs() <= 1e-5,
                "matrices differ at element {index}: {lhs} vs {rhs}"
            );
        }
    }

    struct RecordingRenderer {
        model: Matrix4<f32>,
        material: Vector4<f32>,
        draws: Vec<(MeshHandle, Matrix4<f32>, Vector4<f32>)>,
    }

    impl RecordingRenderer {
        fn new() -> Self {
            Self {
                model: Matrix4::identity(),
                material: Vector4::zero(),
                draws: Vec::new(),
            }
        }
    }

    impl SceneRenderer for RecordingRenderer {
        fn set_model_matrix(&mut self, matrix: Matrix4<f32>) {
            self.model = matrix;
        }

        fn set_material(&mut self, material: Vector4<f32>) {
            self.material = material;
        }

        fn draw_primitive(&mut self, primitive: MeshHandle) {
            self.draws.push((primitive, self.model, self.material));
        }
    }

    #[test]
    fn test_new_node_defaults() {
        let node = test_node();
        assert_eq!(node.position(), Vector3::zero());
        assert_eq!(node.scale(), Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(node.mass(), 1.0);
        assert_eq!(node.material(), Vector4::new(0.1, 1.0, 0.3, 4.0));
        assert_eq!(node.forces().len(), 1);
        assert_eq!(node.forces()[0], Vector3::new(0.0, -38.0, 0.0));
    }

    #[test]
    fn test_empty_primitives_rejected() {
        let result = SpatialNode::new(Vec::new());
        assert!(matches!(result, Err(SceneError::EmptyPrimitives)));
    }

    #[test]
    fn test_node_ids_are_unique() {
        let a = test_node();
        let b = test_node();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_pure_translation_transform() {
        let mut node = test_node();
        node.set_position(Vector3::new(1.0, 2.0, 3.0));
        assert_mat4_near(
            node.local_transform(),
            Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0)),
        );
    }

    #[test]
    fn test_base_transform_applies_first() {
        let base = Matrix4::from_translation(Vector3::new(0.0, 0.0, 1.0));
        let mut node = SpatialNode::with_base_transform(vec![MeshHandle(0)], base).unwrap();
        node.set_position(Vector3::new(1.0, 0.0, 0.0));
        node.set_scale(Vector3::new(2.0, 2.0, 2.0));

        // The baked translation is scaled by the node's scale, so the
        // composed offset is (1, 0, 2) rather than (1, 0, 1).
        let composed = node.local_transform();
        assert_vec3_near(
            Vector3::new(composed.w.x, composed.w.y, composed.w.z),
            Vector3::new(1.0, 0.0, 2.0),
            1e-5,
        );
    }

    #[test]
    fn test_rotation_pivots_about_center() {
        let mut node = test_node();
        node.set_center(Vector3::new(1.0, 0.0, 0.0));
        node.set_orientation(Vector3::new(0.0, std::f32::consts::PI, 0.0));

        // A half turn about Y around the pivot maps the origin to (2, 0, 0).
        let transform = node.local_transform();
        assert_vec3_near(
            Vector3::new(transform.w.x, transform.w.y, transform.w.z),
            Vector3::new(2.0, 0.0, 0.0),
            1e-5,
        );
    }

    #[test]
    fn test_translate_round_trip() {
        let mut node = test_node();
        node.set_position(Vector3::new(0.5, 1.5, -2.0));
        let offset = Vector3::new(3.2, -1.7, 0.4);
        node.translate(offset);
        node.translate(-offset);
        assert_vec3_near(node.position(), Vector3::new(0.5, 1.5, -2.0), 1e-6);
    }

    #[test]
    fn test_grow_multiplies_scale() {
        let mut node = test_node();
        node.set_scale(Vector3::new(2.0, 1.0, 0.5));
        node.grow(Vector3::new(2.0, 3.0, 4.0));
        assert_eq!(node.scale(), Vector3::new(4.0, 3.0, 2.0));
    }

    #[test]
    fn test_projectile_velocity_matches_gravity() {
        let mut node = test_node();
        node.set_position(Vector3::new(0.0, 100.0, 0.0));

        let dt = 0.01;
        for _ in 0..100 {
            node.tick(dt);
        }

        // After one simulated second of free fall, velocity is g * t.
        assert!((node.velocity().y - (-38.0)).abs() < 1e-3);
        assert!(node.position().y > 0.0);
        assert!(node.position().y < 100.0);
    }

    #[test]
    fn test_zero_mass_ignores_forces() {
        let mut node = test_node();
        node.set_mass(0.0);
        node.set_position(Vector3::new(0.0, 5.0, 0.0));
        node.add_force(Vector3::new(100.0, 100.0, 100.0));

        node.tick(0.1);

        assert_eq!(node.acceleration(), Vector3::zero());
        assert_eq!(node.velocity(), Vector3::zero());
        assert_vec3_near(node.position(), Vector3::new(0.0, 5.0, 0.0), 1e-6);
    }

    #[test]
    fn test_position_never_sinks_below_ground() {
        let mut node = test_node();
        node.set_position(Vector3::new(0.0, -5.0, 0.0));
        node.tick(0.01);
        assert!(node.position().y >= 0.0);

        node.set_position(Vector3::new(0.0, 2.0, 0.0));
        node.set_velocity(Vector3::new(0.0, -50.0, 0.0));
        for _ in 0..200 {
            node.tick(0.01);
            assert!(node.position().y >= 0.0);
        }
    }

    #[test]
    fn test_ground_friction_brings_slide_to_rest() {
        let mut node = test_node();
        node.set_velocity(Vector3::new(10.0, 0.0, 0.0));

        let dt = 1.0 / 240.0;
        let decel_per_tick = 0.5 * 38.0 * dt;
        let mut previous = 10.0;
        for _ in 0..480 {
            node.tick(dt);
            let speed = Vector3::new(node.velocity().x, 0.0, node.velocity().z).magnitude();
            if previous > decel_per_tick {
                assert!(speed <= previous + 1e-6);
            }
            previous = speed;
            assert_eq!(node.position().y, 0.0);
        }

        // 10 / (0.5 * 38) is just over half a second, so two seconds of
        // ticks leave at most one tick's worth of residual speed.
        assert!(previous < 0.1, "residual speed {previous}");
    }

    #[test]
    fn test_resting_node_stays_put() {
        let mut node = test_node();
        for _ in 0..100 {
            node.tick(0.01);
        }
        assert_eq!(node.position(), Vector3::zero());
        assert_eq!(node.velocity(), Vector3::zero());
        assert_eq!(node.acceleration(), Vector3::zero());
    }

    #[test]
    fn test_clear_forces_restores_baseline() {
        let mut node = test_node();
        node.add_force(Vector3::new(1.0, 2.0, 3.0));
        node.add_force(Vector3::new(-4.0, 0.0, 0.0));
        node.clear_forces();
        assert_eq!(node.forces(), &[Vector3::new(0.0, -38.0, 0.0)]);

        node.set_mass(2.0);
        assert_eq!(node.forces(), &[Vector3::new(0.0, -76.0, 0.0)]);
    }

    #[test]
    fn test_applied_force_lasts_one_tick() {
        let mut node = test_node();
        node.set_position(Vector3::new(0.0, 50.0, 0.0));
        node.add_force(Vector3::new(38.0, 38.0, 0.0));

        node.tick(0.01);
        // The push registered alongside gravity for exactly one tick.
        assert_vec3_near(node.acceleration(), Vector3::new(38.0, 0.0, 0.0), 1e-4);

        node.tick(0.01);
        assert_vec3_near(node.acceleration(), Vector3::new(0.0, -38.0, 0.0), 1e-4);
    }

    #[test]
    fn test_custom_physics_config() {
        let config = PhysicsConfig {
            gravity: Vector3::new(0.0, -1.0, 0.0),
            friction: 0.0,
        };
        let mut node =
            SpatialNode::with_config(vec![MeshHandle(0)], Matrix4::identity(), config).unwrap();
        node.set_position(Vector3::new(0.0, 10.0, 0.0));
        node.tick(1.0);
        assert_vec3_near(node.velocity(), Vector3::new(0.0, -1.0, 0.0), 1e-6);
    }

    #[test]
    fn test_find_reaches_nested_children() {
        let mut root = test_node();
        let mut middle = test_node();
        let leaf = test_node();
        let leaf_id = middle.add_child(leaf);
        let middle_id = root.add_child(middle);

        assert!(root.find(root.id()).is_some());
        assert!(root.find(middle_id).is_some());
        assert!(root.find(leaf_id).is_some());
        assert!(root.find(test_node().id()).is_none());

        root.find_mut(leaf_id)
            .unwrap()
            .set_position(Vector3::new(7.0, 0.0, 0.0));
        assert_eq!(
            root.find(leaf_id).unwrap().position(),
            Vector3::new(7.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_duplicate_mints_fresh_ids() {
        let mut root = test_node();
        root.set_name("boat");
        root.set_position(Vector3::new(1.0, 0.0, 0.0));
        let child_id = root.add_child(test_node());

        let copy = root.duplicate();
        assert_ne!(copy.id(), root.id());
        assert_ne!(copy.child(0).id(), child_id);
        assert_eq!(copy.name(), Some("boat"));
        assert_eq!(copy.position(), root.position());
        assert_eq!(copy.children().len(), 1);
    }

    #[test]
    fn test_tick_advances_children() {
        let mut root = test_node();
        let mut child = test_node();
        child.set_position(Vector3::new(0.0, 10.0, 0.0));
        let child_id = root.add_child(child);

        root.tick(0.1);

        let child = root.find(child_id).unwrap();
        assert!(child.velocity().y < 0.0);
        assert!(child.position().y < 10.0);
    }

    #[test]
    fn test_render_composes_parent_child_transforms() {
        let mut parent = test_node();
        parent.set_position(Vector3::new(2.0, 0.0, 0.0));
        let mut child = test_node();
        child.set_position(Vector3::new(1.0, 0.0, 0.0));
        parent.add_child(child);

        let mut recorder = RecordingRenderer::new();
        parent.render(&mut recorder);

        assert_eq!(recorder.draws.len(), 2);
        let (_, parent_model, _) = recorder.draws[0];
        let (_, child_model, _) = recorder.draws[1];
        assert_mat4_near(
            parent_model,
            Matrix4::from_translation(Vector3::new(2.0, 0.0, 0.0)),
        );
        assert_mat4_near(
            child_model,
            Matrix4::from_translation(Vector3::new(3.0, 0.0, 0.0)),
        );
    }

    #[test]
    fn test_render_emits_parent_before_children() {
        let mut parent = test_node();
        parent.set_material(Vector4::new(1.0, 0.0, 0.0, 1.0));
        let mut child = SpatialNode::new(vec![MeshHandle(7)]).unwrap();
        child.set_material(Vector4::new(0.0, 1.0, 0.0, 1.0));
        parent.add_child(child);

        let mut recorder = RecordingRenderer::new();
        parent.render(&mut recorder);

        assert_eq!(recorder.draws[0].0, MeshHandle(0));
        assert_eq!(recorder.draws[1].0, MeshHandle(7));
        assert_eq!(recorder.draws[0].2, Vector4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(recorder.draws[1].2, Vector4::new(0.0, 1.0, 0.0, 1.0));
    }
}
