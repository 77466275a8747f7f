//! Mesh data handed to geometry upload, and the loaders that produce it.

mod obj;

use std::path::Path;

pub use crate::error::ModelError;
pub use obj::ObjLoader;

/// One drawable mesh. `positions` and `normals` are parallel streams;
/// `indices` holds three entries per triangle and is trusted to stay in
/// range of those streams.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub meshes: Vec<MeshData>,
}

pub trait ModelSource {
    fn load(&self, path: &Path) -> Result<Model, ModelError>;
}
