//! wgpu render engine: surface management, pipelines, and frame replay of
//! the scene graph's draw stream.

use std::{iter, sync::Arc};

use cgmath::{Matrix4, SquareMatrix, Vector4, Zero};
use wgpu::{DepthStencilState, RenderPipeline, TextureFormat};

use crate::gfx::camera::Camera;
use crate::gfx::lighting::LightRig;
use crate::gfx::mesh::{MeshRegistry, Vertex3D};
use crate::scene::{MeshHandle, Scene, SceneRenderer};

/// Stride between per-draw uniform slots. 256 is the offset alignment wgpu
/// guarantees on downlevel hardware, so it works everywhere.
const MODEL_UNIFORM_STRIDE: u64 = 256;
const MODEL_UNIFORM_SIZE: u64 = std::mem::size_of::<ModelUniform>() as u64;
const INITIAL_DRAW_CAPACITY: usize = 256;

/// MUST match `Model` in shader.wgsl exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
    pub material: [f32; 4],
}

struct DrawItem {
    primitive: MeshHandle,
    uniform: ModelUniform,
}

/// Records the draw stream of a scene walk for later replay into a render
/// pass.
///
/// The graph publishes state changes through [`SceneRenderer`]; the list
/// snapshots the current matrix and material into each recorded draw, which
/// is what lets one uniform buffer serve every draw at a dynamic offset.
pub struct DrawList {
    model: Matrix4<f32>,
    material: Vector4<f32>,
    items: Vec<DrawItem>,
}

impl DrawList {
    pub fn new() -> Self {
        Self {
            model: Matrix4::identity(),
            material: Vector4::zero(),
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn items(&self) -> &[DrawItem] {
        &self.items
    }
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneRenderer for DrawList {
    fn set_model_matrix(&mut self, matrix: Matrix4<f32>) {
        self.model = matrix;
    }

    fn set_material(&mut self, material: Vector4<f32>) {
        self.material = material;
    }

    fn draw_primitive(&mut self, primitive: MeshHandle) {
        self.items.push(DrawItem {
            primitive,
            uniform: ModelUniform {
                model: self.model.into(),
                material: self.material.into(),
            },
        });
    }
}

/// Depth attachment sized to the surface.
struct DepthTexture {
    view: wgpu::TextureView,
}

impl DepthTexture {
    const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    fn create(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration, label: &str) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[Self::DEPTH_FORMAT],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self { view }
    }
}

pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: DepthTexture,
    format: TextureFormat,

    /// Indexed by [`ShaderHandle`](crate::scene::ShaderHandle): lit, flat.
    pipelines: [RenderPipeline; 2],

    global_buffer: wgpu::Buffer,
    lights_buffer: wgpu::Buffer,
    global_bind_group: wgpu::BindGroup,

    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    model_bind_group_layout: wgpu::BindGroupLayout,
    model_capacity: usize,
}

impl RenderEngine {
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> RenderEngine {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window).unwrap();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to request adapter!");

        let (device, queue) = {
            adapter
                .request_device(&wgpu::DeviceDescriptor {
                    label: Some("WGPU Device"),
                    required_features: wgpu::Features::default(),
                    required_limits: wgpu::Limits {
                        max_texture_dimension_2d: 4096,
                        ..wgpu::Limits::downlevel_defaults()
                    },
                    memory_hints: wgpu::MemoryHints::default(),
                    trace: wgpu::Trace::Off,
                })
                .await
                .expect("Failed to request a device!")
        };

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: surface_capabilities.present_modes[0],
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let depth_texture = DepthTexture::create(&device, &config, "depth_texture");

        // Frame-global uniforms: camera at binding 0, light rig at 1.

        let global_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Globals Uniform Buffer"),
            size: std::mem::size_of::<crate::gfx::camera::CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let lights_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Lights Uniform Buffer"),
            size: std::mem::size_of::<crate::gfx::lighting::LightsUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let global_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Globals Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                ],
            });
        let global_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &global_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: global_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights_buffer.as_entire_binding(),
                },
            ],
        });

        // Per-draw uniforms live in one buffer, bound once and re-offset
        // per draw; a plain uniform cannot be rewritten mid-pass.

        let model_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Model Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(MODEL_UNIFORM_SIZE),
                    },
                    count: None,
                }],
            });
        let (model_buffer, model_bind_group) =
            Self::create_model_buffer(&device, &model_bind_group_layout, INITIAL_DRAW_CAPACITY);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: None,
            bind_group_layouts: &[&global_bind_group_layout, &model_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipelines = [
            Self::create_pipeline(&device, &pipeline_layout, &shader, format, "fs_lit"),
            Self::create_pipeline(&device, &pipeline_layout, &shader, format, "fs_flat"),
        ];

        RenderEngine {
            device: device.into(),
            config,
            format,
            surface,
            queue: queue.into(),
            pipelines,
            depth_texture,

            global_buffer,
            lights_buffer,
            global_bind_group,

            model_buffer,
            model_bind_group,
            model_bind_group_layout,
            model_capacity: INITIAL_DRAW_CAPACITY,
        }
    }

    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        format: TextureFormat,
        fragment_entry: &str,
    ) -> RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(fragment_entry),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex3D::desc()],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
                unclipped_depth: false,
            },
            depth_stencil: Some(DepthStencilState {
                format: DepthTexture::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some(fragment_entry),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview: None,
            cache: None,
        })
    }

    fn create_model_buffer(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Model Uniform Buffer"),
            size: capacity as u64 * MODEL_UNIFORM_STRIDE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(MODEL_UNIFORM_SIZE),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn ensure_model_capacity(&mut self, draws: usize) {
        if draws <= self.model_capacity {
            return;
        }
        let capacity = draws.next_power_of_two();
        log::debug!("growing model uniform buffer to {capacity} draw slots");
        let (buffer, bind_group) =
            Self::create_model_buffer(&self.device, &self.model_bind_group_layout, capacity);
        self.model_buffer = buffer;
        self.model_bind_group = bind_group;
        self.model_capacity = capacity;
    }

    /// Pushes the frame's camera and lighting state to the GPU.
    pub fn update(&mut self, camera: &Camera, lights: &LightRig) {
        self.queue
            .write_buffer(&self.global_buffer, 0, bytemuck::bytes_of(&camera.uniform()));
        self.queue
            .write_buffer(&self.lights_buffer, 0, bytemuck::bytes_of(&lights.to_uniform()));
    }

    /// Walks the scene into a draw list and replays it in a single pass.
    pub fn render_frame(&mut self, scene: &Scene, registry: &MeshRegistry) {
        let mut draw_list = DrawList::new();
        scene.render(&mut draw_list);

        self.ensure_model_capacity(draw_list.len());
        if !draw_list.is_empty() {
            let mut staging = vec![0u8; draw_list.len() * MODEL_UNIFORM_STRIDE as usize];
            for (index, item) in draw_list.items().iter().enumerate() {
                let offset = index * MODEL_UNIFORM_STRIDE as usize;
                staging[offset..offset + MODEL_UNIFORM_SIZE as usize]
                    .copy_from_slice(bytemuck::bytes_of(&item.uniform));
            }
            self.queue.write_buffer(&self.model_buffer, 0, &staging);
        }

        let surface_texture = self
            .surface
            .get_current_texture()
            .expect("Failed to get surface texture!");

        let surface_texture_view =
            surface_texture
                .texture
                .create_view(&wgpu::TextureViewDescriptor {
                    format: Some(self.format),
                    ..Default::default()
                });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.1,
                            g: 0.2,
                            b: 0.3,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipelines[scene.shader().index()]);
            render_pass.set_bind_group(0, &self.global_bind_group, &[]);

            for (index, item) in draw_list.items().iter().enumerate() {
                let offset = (index as u64 * MODEL_UNIFORM_STRIDE) as u32;
                render_pass.set_bind_group(1, &self.model_bind_group, &[offset]);

                let mesh = registry.get(item.primitive);
                let (vertex_buffer, index_buffer) = mesh.buffers();
                render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
                render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count(), 0, 0..1);
            }
        }

        self.queue.submit(iter::once(encoder.finish()));
        surface_texture.present();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture = DepthTexture::create(&self.device, &self.config, "depth_texture");
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}
