use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::asset::{self, ImportError, ImportOptions};
use crate::gfx::{Camera, LightRig, MeshRegistry, RenderEngine};
use crate::scene::{NodeId, Scene};

/// Windowed application driving one [`Scene`].
///
/// Owns the event loop and everything a frame needs: the scene graph, the
/// mesh registry, the camera and the light rig. Populate the scene through
/// the accessors, then hand control to [`run`](DemoApp::run).
pub struct DemoApp {
    event_loop: Option<EventLoop<()>>,
    state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    engine: Option<RenderEngine>,
    scene: Scene,
    registry: MeshRegistry,
    camera: Camera,
    lights: LightRig,
    last_frame: Option<Instant>,
}

impl DemoApp {
    /// Creates an app with an empty scene, the default camera and the
    /// default light rig.
    pub fn new() -> Self {
        let event_loop = EventLoop::new().expect("Failed to create event loop");

        Self {
            event_loop: Some(event_loop),
            state: AppState {
                window: None,
                engine: None,
                scene: Scene::default(),
                registry: MeshRegistry::new(),
                camera: Camera::default(),
                lights: LightRig::default(),
                last_frame: None,
            },
        }
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.state.scene
    }

    pub fn registry_mut(&mut self) -> &mut MeshRegistry {
        &mut self.state.registry
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.state.camera
    }

    pub fn lights_mut(&mut self) -> &mut LightRig {
        &mut self.state.lights
    }

    /// Imports an OBJ file and adds it to the scene as a root node.
    pub fn add_object(
        &mut self,
        path: impl AsRef<Path>,
        options: ImportOptions,
    ) -> Result<NodeId, ImportError> {
        let node = asset::load_obj(path, options, &mut self.state.registry)?;
        Ok(self.state.scene.add_node(node))
    }

    /// Runs the event loop until the window closes (consumes self).
    pub fn run(mut self) {
        let event_loop = self.event_loop.take().expect("Event loop already consumed");
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.state)
            .expect("Failed to run event loop");
    }
}

impl Default for DemoApp {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Ok(window) = event_loop.create_window(
            WindowAttributes::default()
                .with_title("kelpie")
                .with_inner_size(winit::dpi::LogicalSize::new(1200, 800)),
        ) {
            let window_handle = Arc::new(window);
            self.window = Some(window_handle.clone());

            let (width, height) = window_handle.inner_size().into();

            let window_clone = window_handle.clone();
            let engine = pollster::block_on(async move {
                RenderEngine::new(window_clone, width, height).await
            });

            self.registry.upload_all(engine.device());
            self.camera.resize_projection(width, height);

            self.engine = Some(engine);
            self.last_frame = None;
        }
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: winit::event::WindowEvent,
    ) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        ..
                    },
                ..
            } => {
                if matches!(key_code, winit::keyboard::KeyCode::Escape) {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.camera.resize_projection(width, height);
                engine.resize(width, height);
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                // First frame after resume advances by zero.
                let now = Instant::now();
                let dt = self
                    .last_frame
                    .map(|last| (now - last).as_secs_f32())
                    .unwrap_or(0.0);
                self.last_frame = Some(now);

                self.scene.tick(dt);

                engine.update(&self.camera, &self.lights);
                engine.render_frame(&self.scene, &self.registry);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
