//! Procedural geometry for the built-in primitive shapes.
//!
//! Generators produce CPU-side [`GeometryData`] that uploads through the
//! mesh registry; no model files are needed for basic shapes. The world is
//! Y-up, so planes lie in XZ and cylinders stand along Y.

pub mod primitives;

pub use primitives::*;

use crate::gfx::mesh::Vertex3D;

/// Generated geometry ready to become a [`Mesh`](crate::gfx::Mesh).
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z).
    pub positions: Vec<[f32; 3]>,
    /// Normal vectors, one per position.
    pub normals: Vec<[f32; 3]>,
    /// Texture coordinates, one per position.
    pub uvs: Vec<[f32; 2]>,
    /// Triangle indices, counter-clockwise winding.
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves the attribute arrays into the renderer's vertex format.
    ///
    /// Missing normals fall back to +Y and missing UVs to the origin, so a
    /// partially filled structure still produces drawable vertices.
    pub fn to_vertices(&self) -> (Vec<Vertex3D>, Vec<u32>) {
        let vertices = (0..self.positions.len())
            .map(|i| Vertex3D {
                position: self.positions[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                uv: self.uvs.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect();
        (vertices, self.indices.clone())
    }
}
