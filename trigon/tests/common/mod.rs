#![allow(dead_code)]

use std::path::{Path, PathBuf};

use glam::Vec3;
use trigon::camera::CameraView;
use trigon::error::ModelError;
use trigon::model::{MeshData, Model, ModelSource};

pub const VERTEX_SHADER: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../assets/shaders/vertex_shader.wgsl"
);
pub const FRAGMENT_SHADER: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../assets/shaders/fragment_shader.wgsl"
);
pub const CUBE_MODEL: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../assets/models/cube.obj");

/// Writes `contents` to a per-process temp file named after `name`.
pub fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("trigon-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).expect("temp file should be writable");
    path
}

#[derive(Debug, Clone, Copy)]
pub struct FixedCamera {
    pub position: Vec3,
    pub look: Vec3,
    pub up: Vec3,
}

impl FixedCamera {
    pub fn new(position: Vec3, look: Vec3, up: Vec3) -> Self {
        Self { position, look, up }
    }
}

impl CameraView for FixedCamera {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn look_vector(&self) -> Vec3 {
        self.look
    }

    fn up_vector(&self) -> Vec3 {
        self.up
    }
}

/// Hands out a prepared model regardless of path.
pub struct InMemoryModel(pub Model);

impl ModelSource for InMemoryModel {
    fn load(&self, _path: &Path) -> Result<Model, ModelError> {
        Ok(self.0.clone())
    }
}

/// 8 corners, 12 triangles, unit normals pointing away from the centre.
pub fn cube_mesh(name: &str) -> MeshData {
    let positions: Vec<[f32; 3]> = vec![
        [-1.0, -1.0, 1.0],
        [1.0, -1.0, 1.0],
        [1.0, 1.0, 1.0],
        [-1.0, 1.0, 1.0],
        [-1.0, -1.0, -1.0],
        [1.0, -1.0, -1.0],
        [1.0, 1.0, -1.0],
        [-1.0, 1.0, -1.0],
    ];
    let normals = positions
        .iter()
        .map(|p| Vec3::from_array(*p).normalize().to_array())
        .collect();
    let indices = vec![
        0, 1, 2, 0, 2, 3, // front
        5, 4, 7, 5, 7, 6, // back
        1, 5, 6, 1, 6, 2, // right
        4, 0, 3, 4, 3, 7, // left
        3, 2, 6, 3, 6, 7, // top
        4, 5, 1, 4, 1, 0, // bottom
    ];
    MeshData {
        name: name.to_string(),
        positions,
        normals,
        indices,
    }
}
