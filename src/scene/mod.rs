//! Scene graph, animation and rigid-body motion, independent of the GPU.
//!
//! Everything in this module operates on plain `cgmath` values and opaque
//! handles. Rendering enters only through the [`SceneRenderer`] trait, so
//! the whole module runs under `cargo test` with no adapter present.

mod animation;
mod animator;
mod node;
mod physics;

pub use animation::Animation;
pub use animator::Animator;
pub use node::{NodeId, SceneRenderer, SpatialNode};
pub use physics::PhysicsConfig;

use thiserror::Error;

/// Construction errors surfaced by the scene module.
#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    /// A node exists to be drawn; an empty primitive list is a mistake.
    #[error("a spatial node requires at least one primitive")]
    EmptyPrimitives,
    /// Animations derive a per-second rate by dividing by the duration.
    #[error("animation duration must be positive, got {0}")]
    InvalidDuration(f32),
}

/// Opaque reference to a mesh owned by the engine's mesh registry.
///
/// Handles are minted by the registry at upload time and stay valid for the
/// registry's lifetime; meshes are never removed. Nodes store handles
/// instead of buffers so the graph itself stays GPU-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub(crate) u32);

impl MeshHandle {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Selects which of the engine's shading pipelines draws a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderHandle(pub(crate) u32);

impl ShaderHandle {
    /// Blinn-Phong shading under the scene's light rig.
    pub const LIT: ShaderHandle = ShaderHandle(0);
    /// Normal-tinted shading that ignores lights, handy for debugging.
    pub const FLAT: ShaderHandle = ShaderHandle(1);

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies an animator within one [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimatorId(u64);

/// A renderable world: root nodes, their animators, and the pipeline the
/// whole scene draws with.
///
/// Per tick, animators run first in insertion order, then physics walks
/// the root forest. Animation output therefore lands in the same frame's
/// integration step.
pub struct Scene {
    shader: ShaderHandle,
    roots: Vec<SpatialNode>,
    animators: Vec<(AnimatorId, Animator)>,
    next_animator_id: u64,
}

impl Scene {
    pub fn new(shader: ShaderHandle) -> Self {
        Self {
            shader,
            roots: Vec::new(),
            animators: Vec::new(),
            next_animator_id: 0,
        }
    }

    pub fn shader(&self) -> ShaderHandle {
        self.shader
    }

    /// Switches the pipeline the scene draws with, effective next frame.
    pub fn set_shader(&mut self, shader: ShaderHandle) {
        self.shader = shader;
    }

    /// Adopts a root node and returns its id for later lookup.
    pub fn add_node(&mut self, node: SpatialNode) -> NodeId {
        let id = node.id();
        self.roots.push(node);
        id
    }

    pub fn nodes(&self) -> &[SpatialNode] {
        &self.roots
    }

    pub fn nodes_mut(&mut self) -> &mut [SpatialNode] {
        &mut self.roots
    }

    /// Finds a node anywhere in the forest.
    pub fn node(&self, id: NodeId) -> Option<&SpatialNode> {
        self.roots.iter().find_map(|root| root.find(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SpatialNode> {
        self.roots.iter_mut().find_map(|root| root.find_mut(id))
    }

    /// Registers an animator and returns the id that addresses it.
    pub fn add_animator(&mut self, animator: Animator) -> AnimatorId {
        let id = AnimatorId(self.next_animator_id);
        self.next_animator_id += 1;
        self.animators.push((id, animator));
        id
    }

    pub fn animator(&self, id: AnimatorId) -> Option<&Animator> {
        self.animators
            .iter()
            .find(|(aid, _)| *aid == id)
            .map(|(_, animator)| animator)
    }

    pub fn animator_mut(&mut self, id: AnimatorId) -> Option<&mut Animator> {
        self.animators
            .iter_mut()
            .find(|(aid, _)| *aid == id)
            .map(|(_, animator)| animator)
    }

    /// Detaches an animator mid-flight; whatever it has already applied to
    /// its target stays applied. Returns `None` for an unknown id.
    pub fn remove_animator(&mut self, id: AnimatorId) -> Option<Animator> {
        let index = self.animators.iter().position(|(aid, _)| *aid == id)?;
        Some(self.animators.remove(index).1)
    }

    /// Starts every registered animator.
    pub fn start_animators(&mut self) {
        for (_, animator) in &mut self.animators {
            animator.start();
        }
    }

    /// Advances the world by `dt` seconds: animators first, physics second.
    pub fn tick(&mut self, dt: f32) {
        for (_, animator) in &mut self.animators {
            animator.tick(dt, &mut self.roots);
        }
        for root in &mut self.roots {
            root.tick(dt);
        }
    }

    /// Draws every root under an identity ambient transform, in insertion
    /// order.
    pub fn render(&self, renderer: &mut dyn SceneRenderer) {
        for root in &self.roots {
            root.render(renderer);
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(ShaderHandle::LIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Matrix4, Vector3, Vector4};

    fn test_node() -> SpatialNode {
        SpatialNode::new(vec![MeshHandle(0)]).unwrap()
    }

    struct CountingRenderer {
        draws: Vec<Matrix4<f32>>,
    }

    impl SceneRenderer for CountingRenderer {
        fn set_model_matrix(&mut self, matrix: Matrix4<f32>) {
            self.draws.push(matrix);
        }

        fn set_material(&mut self, _material: Vector4<f32>) {}

        fn draw_primitive(&mut self, _primitive: MeshHandle) {}
    }

    #[test]
    fn test_node_lookup_spans_the_forest() {
        let mut scene = Scene::default();
        let mut parent = test_node();
        let child_id = parent.add_child(test_node());
        let parent_id = scene.add_node(parent);
        let loner_id = scene.add_node(test_node());

        assert!(scene.node(parent_id).is_some());
        assert!(scene.node(child_id).is_some());
        assert!(scene.node(loner_id).is_some());

        scene
            .node_mut(child_id)
            .unwrap()
            .set_position(Vector3::new(0.0, 4.0, 0.0));
        assert_eq!(
            scene.node(child_id).unwrap().position(),
            Vector3::new(0.0, 4.0, 0.0)
        );
    }

    #[test]
    fn test_animators_run_before_physics() {
        let mut scene = Scene::default();
        let mut node = test_node();
        node.set_position(Vector3::new(0.0, 1.0, 0.0));
        let id = scene.add_node(node);

        // Lower the node onto the ground plane via animation. If physics
        // ran first it would free-fall for the whole tick and pick up
        // vertical speed; animators-first leaves it resting with zero
        // velocity.
        let mut animator = Animator::new();
        animator.add_animation(
            Animation::translation(id, 1.0, Vector3::new(0.0, -1.0, 0.0)).unwrap(),
        );
        scene.add_animator(animator);
        scene.start_animators();

        scene.tick(1.0);

        let node = scene.node(id).unwrap();
        assert_eq!(node.position().y, 0.0);
        assert_eq!(node.velocity().y, 0.0);
    }

    #[test]
    fn test_animators_run_in_insertion_order() {
        let mut scene = Scene::default();
        let id = scene.add_node(test_node());

        // Both animators target the same node; their per-tick offsets
        // accumulate regardless of order, and both make progress in the
        // same tick.
        let mut first = Animator::new();
        first.add_animation(Animation::translation(id, 1.0, Vector3::new(1.0, 0.0, 0.0)).unwrap());
        let mut second = Animator::new();
        second.add_animation(Animation::rotation(id, 1.0, Vector3::new(0.0, 1.0, 0.0)).unwrap());
        scene.add_animator(first);
        scene.add_animator(second);
        scene.start_animators();

        scene.tick(0.5);

        let node = scene.node(id).unwrap();
        assert_eq!(node.position().x, 0.5);
        assert_eq!(node.orientation().y, 0.5);
    }

    #[test]
    fn test_remove_animator_cancels_playback() {
        let mut scene = Scene::default();
        let node_id = scene.add_node(test_node());

        let mut animator = Animator::new();
        animator.add_animation(
            Animation::translation(node_id, 2.0, Vector3::new(2.0, 0.0, 0.0)).unwrap(),
        );
        let animator_id = scene.add_animator(animator);
        scene.start_animators();

        scene.tick(0.5);
        assert_eq!(scene.node(node_id).unwrap().position().x, 0.5);

        let removed = scene.remove_animator(animator_id);
        assert!(removed.is_some());
        assert!(scene.animator(animator_id).is_none());
        assert!(scene.remove_animator(animator_id).is_none());

        // Progress made so far sticks; nothing advances it further.
        scene.tick(0.5);
        assert_eq!(scene.node(node_id).unwrap().position().x, 0.5);
    }

    #[test]
    fn test_render_visits_roots_in_insertion_order() {
        let mut scene = Scene::default();
        let mut first = test_node();
        first.set_position(Vector3::new(1.0, 0.0, 0.0));
        let mut second = test_node();
        second.set_position(Vector3::new(2.0, 0.0, 0.0));
        scene.add_node(first);
        scene.add_node(second);

        let mut recorder = CountingRenderer { draws: Vec::new() };
        scene.render(&mut recorder);

        assert_eq!(recorder.draws.len(), 2);
        assert_eq!(recorder.draws[0].w.x, 1.0);
        assert_eq!(recorder.draws[1].w.x, 2.0);
    }
}
