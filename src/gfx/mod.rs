//! GPU-facing half of the crate: camera, lights, meshes, and the wgpu
//! render engine that replays a scene's draw stream each frame.
//!
//! Everything in here is deliberately decoupled from the scene graph; the
//! graph talks to the renderer only through the
//! [`SceneRenderer`](crate::scene::SceneRenderer) trait, so the scene side
//! stays testable without a GPU.

pub mod camera;
pub mod geometry;
pub mod lighting;
pub mod mesh;
pub mod render_engine;

pub use camera::Camera;
pub use lighting::{DirectionalLight, LightRig, PointLight, MAX_POINT_LIGHTS};
pub use mesh::{Mesh, MeshRegistry, Vertex3D};
pub use render_engine::RenderEngine;
