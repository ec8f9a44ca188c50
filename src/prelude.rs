//! # Kelpie Prelude
//!
//! One import for the types a typical demo touches.
//!
//! ```no_run
//! use kelpie::prelude::*;
//!
//! fn main() {
//!     let mut app = kelpie::default();
//!
//!     let cube = app.registry_mut().insert_geometry(&generate_cube());
//!     let node = SpatialNode::new(vec![cube]).unwrap();
//!     app.scene_mut().add_node(node);
//!
//!     app.run();
//! }
//! ```

// Re-export core application types
pub use crate::app::DemoApp;
pub use crate::default;

// Scene graph, motion and animation
pub use crate::scene::{
    Animation, Animator, AnimatorId, MeshHandle, NodeId, PhysicsConfig, Scene, SceneError,
    SceneRenderer, ShaderHandle, SpatialNode,
};

// Graphics and import
pub use crate::asset::{load_obj, ImportError, ImportOptions};
pub use crate::gfx::geometry::{
    generate_cube, generate_cylinder, generate_plane, generate_sphere, GeometryData,
};
pub use crate::gfx::{
    Camera, DirectionalLight, LightRig, Mesh, MeshRegistry, PointLight, RenderEngine, Vertex3D,
    MAX_POINT_LIGHTS,
};

// Re-export common external dependencies
pub use cgmath::{Deg, InnerSpace, Matrix4, Point3, Rad, SquareMatrix, Vector3, Vector4, Zero};
