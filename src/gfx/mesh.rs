//! Mesh storage and the registry that hands out handles to it.

use wgpu::util::DeviceExt;

use crate::gfx::geometry::GeometryData;
use crate::scene::MeshHandle;

/// A single vertex as the GPU sees it.
///
/// `#[repr(C)]` keeps the layout stable for buffer upload; attribute order
/// must match the vertex inputs in `shader.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex3D {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex3D>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Indexed triangle geometry, held on the CPU until [`Mesh::upload`] runs.
///
/// GPU buffers are created lazily because assets load before the window and
/// device exist.
pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    index_count: u32,
}

impl Mesh {
    /// Builds a mesh from flat attribute arrays as OBJ loaders produce
    /// them: three floats per position and normal, two per UV, all indexed
    /// by the same index list.
    pub fn new(positions: &[f32], normals: &[f32], uvs: &[f32], indices: Vec<u32>) -> Self {
        let index_count = indices.len() as u32;
        let vertex_count = positions.len() / 3;

        let mut vertices = Vec::with_capacity(vertex_count);
        for i in 0..vertex_count {
            vertices.push(Vertex3D {
                position: [positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]],
                normal: if normals.len() >= (i + 1) * 3 {
                    [normals[i * 3], normals[i * 3 + 1], normals[i * 3 + 2]]
                } else {
                    [0.0, 1.0, 0.0]
                },
                uv: if uvs.len() >= (i + 1) * 2 {
                    [uvs[i * 2], uvs[i * 2 + 1]]
                } else {
                    [0.0, 0.0]
                },
            });
        }

        Self {
            vertices,
            indices,
            vertex_buffer: None,
            index_buffer: None,
            index_count,
        }
    }

    pub fn from_geometry(geometry: &GeometryData) -> Self {
        let (vertices, indices) = geometry.to_vertices();
        let index_count = indices.len() as u32;
        Self {
            vertices,
            indices,
            vertex_buffer: None,
            index_buffer: None,
            index_count,
        }
    }

    /// Averages face normals into per-vertex normals for models that ship
    /// without them.
    pub fn calculate_face_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
        let vertex_count = positions.len() / 3;
        let mut normals = vec![0.0f32; positions.len()];

        for triangle in indices.chunks(3) {
            let i0 = triangle[0] as usize;
            let i1 = triangle[1] as usize;
            let i2 = triangle[2] as usize;

            let v0 = [positions[i0 * 3], positions[i0 * 3 + 1], positions[i0 * 3 + 2]];
            let v1 = [positions[i1 * 3], positions[i1 * 3 + 1], positions[i1 * 3 + 2]];
            let v2 = [positions[i2 * 3], positions[i2 * 3 + 1], positions[i2 * 3 + 2]];

            let edge1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
            let edge2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];

            let face_normal = [
                edge1[1] * edge2[2] - edge1[2] * edge2[1],
                edge1[2] * edge2[0] - edge1[0] * edge2[2],
                edge1[0] * edge2[1] - edge1[1] * edge2[0],
            ];

            for &vertex in &[i0, i1, i2] {
                normals[vertex * 3] += face_normal[0];
                normals[vertex * 3 + 1] += face_normal[1];
                normals[vertex * 3 + 2] += face_normal[2];
            }
        }

        for i in 0..vertex_count {
            let length = (normals[i * 3].powi(2)
                + normals[i * 3 + 1].powi(2)
                + normals[i * 3 + 2].powi(2))
            .sqrt();
            if length > 0.0 {
                normals[i * 3] /= length;
                normals[i * 3 + 1] /= length;
                normals[i * 3 + 2] /= length;
            }
        }

        normals
    }

    pub fn vertices(&self) -> &[Vertex3D] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn is_uploaded(&self) -> bool {
        self.vertex_buffer.is_some()
    }

    /// Creates the GPU buffers for this mesh. Idempotent.
    pub fn upload(&mut self, device: &wgpu::Device) {
        if self.is_uploaded() {
            return;
        }

        self.vertex_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.index_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    /// GPU buffers for drawing.
    ///
    /// # Panics
    ///
    /// Panics when the mesh has not been uploaded; drawing before upload is
    /// a bug in engine bring-up, not a recoverable state.
    pub(crate) fn buffers(&self) -> (&wgpu::Buffer, &wgpu::Buffer) {
        (
            self.vertex_buffer
                .as_ref()
                .expect("mesh drawn before upload"),
            self.index_buffer
                .as_ref()
                .expect("mesh drawn before upload"),
        )
    }
}

/// Owns every mesh in the application and mints the handles nodes carry.
///
/// Meshes are append-only; a handle stays valid for the registry's
/// lifetime, so aliasing one mesh from many nodes is free.
#[derive(Default)]
pub struct MeshRegistry {
    meshes: Vec<Mesh>,
}

impl MeshRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of a mesh and returns the handle that addresses it.
    pub fn insert(&mut self, mesh: Mesh) -> MeshHandle {
        let handle = MeshHandle(self.meshes.len() as u32);
        self.meshes.push(mesh);
        handle
    }

    /// Convenience for the primitive generators.
    pub fn insert_geometry(&mut self, geometry: &GeometryData) -> MeshHandle {
        self.insert(Mesh::from_geometry(geometry))
    }

    /// Resolves a handle. Panics on a handle from another registry, which
    /// is a programming error.
    pub fn get(&self, handle: MeshHandle) -> &Mesh {
        &self.meshes[handle.index()]
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Uploads every mesh that does not have GPU buffers yet.
    pub fn upload_all(&mut self, device: &wgpu::Device) {
        for mesh in &mut self.meshes {
            mesh.upload(device);
        }
        log::debug!("uploaded {} meshes", self.meshes.len());
    }
}
