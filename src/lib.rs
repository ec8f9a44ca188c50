// src/lib.rs
//! Kelpie
//!
//! A small scene graph with rigid body motion and keyframe-free animation,
//! rendered through wgpu and winit.

pub mod app;
pub mod asset;
pub mod gfx;
pub mod prelude;
pub mod scene;

// Re-export main types for convenience
pub use app::DemoApp;

/// Creates a default application instance
pub fn default() -> DemoApp {
    DemoApp::new()
}
