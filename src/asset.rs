//! Wavefront OBJ import.
//!
//! Models are loaded into the [`MeshRegistry`] and wrapped in a single
//! [`SpatialNode`], one primitive per OBJ model. Files without normals get
//! flat face normals so lighting still works on quick test exports.

use std::path::{Path, PathBuf};

use cgmath::Matrix4;
use thiserror::Error;

use crate::gfx::mesh::{Mesh, MeshRegistry};
use crate::scene::{SceneError, SpatialNode};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to load OBJ file")]
    Load(#[from] tobj::LoadError),
    #[error("{path:?} contains no triangle geometry")]
    NoGeometry { path: PathBuf },
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Knobs for [`load_obj`].
#[derive(Debug, Clone, Copy)]
pub struct ImportOptions {
    /// Flip the V texture coordinate. OBJ files exported with an image-space
    /// origin need this to sample right side up.
    pub flip_v: bool,
    /// Correction baked under the node's transform, typically a scale or
    /// recentering for models authored at an awkward size.
    pub base_transform: Matrix4<f32>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            flip_v: false,
            base_transform: Matrix4::from_scale(1.0),
        }
    }
}

/// Loads an OBJ file into the registry and returns a node drawing it.
///
/// Multi-model files become one node with one primitive per model; the node
/// takes its name from the first named model. MTL materials are ignored,
/// shading comes from the node's Phong material.
pub fn load_obj(
    path: impl AsRef<Path>,
    options: ImportOptions,
    registry: &mut MeshRegistry,
) -> Result<SpatialNode, ImportError> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )?;

    let mut primitives = Vec::with_capacity(models.len());
    for model in &models {
        let mesh = &model.mesh;
        if mesh.positions.is_empty() || mesh.indices.is_empty() {
            continue;
        }

        let normals = if !mesh.normals.is_empty() && mesh.normals.len() == mesh.positions.len() {
            mesh.normals.clone()
        } else {
            Mesh::calculate_face_normals(&mesh.positions, &mesh.indices)
        };

        let uvs = if options.flip_v {
            mesh.texcoords
                .chunks_exact(2)
                .flat_map(|uv| [uv[0], 1.0 - uv[1]])
                .collect()
        } else {
            mesh.texcoords.clone()
        };

        let mesh = Mesh::new(&mesh.positions, &normals, &uvs, mesh.indices.clone());
        primitives.push(registry.insert(mesh));
    }

    if primitives.is_empty() {
        return Err(ImportError::NoGeometry {
            path: path.to_path_buf(),
        });
    }

    log::info!("loaded {:?}: {} primitive(s)", path, primitives.len());

    let mut node = SpatialNode::with_base_transform(primitives, options.base_transform)?;
    if let Some(model) = models.iter().find(|m| !m.name.is_empty()) {
        node.set_name(model.name.clone());
    }
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD_OBJ: &str = "demos/assets/quad.obj";

    #[test]
    fn test_load_obj_builds_named_node() {
        let mut registry = MeshRegistry::new();
        let node = load_obj(QUAD_OBJ, ImportOptions::default(), &mut registry).unwrap();

        assert_eq!(node.name(), Some("quad"));
        assert_eq!(node.primitives().len(), 1);
        let mesh = registry.get(node.primitives()[0]);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.index_count(), 6);
    }

    #[test]
    fn test_flip_v_inverts_texture_coordinates() {
        let mut registry = MeshRegistry::new();
        let plain = load_obj(QUAD_OBJ, ImportOptions::default(), &mut registry).unwrap();
        let flipped = load_obj(
            QUAD_OBJ,
            ImportOptions {
                flip_v: true,
                ..Default::default()
            },
            &mut registry,
        )
        .unwrap();

        let plain_uv = registry.get(plain.primitives()[0]).vertices()[0].uv;
        let flipped_uv = registry.get(flipped.primitives()[0]).vertices()[0].uv;
        assert_eq!(plain_uv[0], flipped_uv[0]);
        assert_eq!(flipped_uv[1], 1.0 - plain_uv[1]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut registry = MeshRegistry::new();
        let result = load_obj("demos/assets/missing.obj", ImportOptions::default(), &mut registry);
        assert!(matches!(result, Err(ImportError::Load(_))));
    }
}
