use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub assets: AssetPaths,
    pub projection: ProjectionConfig,
    pub camera: CameraConfig,
    pub overlay: OverlayConfig,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Ok(ron::from_str(&text)?)
    }

    /// Missing file means defaults; a file that exists must parse.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(target: "app", path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Trigon".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    pub model: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            vertex_shader: PathBuf::from("assets/shaders/vertex_shader.wgsl"),
            fragment_shader: PathBuf::from("assets/shaders/fragment_shader.wgsl"),
            model: PathBuf::from("assets/models/cube.obj"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            near: 1.0,
            far: 4000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub look: [f32; 3],
    pub up: [f32; 3],
    /// World units per second.
    pub move_speed: f32,
    /// Radians per pixel of mouse motion.
    pub look_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 5.0],
            look: [0.0, 0.0, -1.0],
            up: [0.0, 1.0, 0.0],
            move_speed: 5.0,
            look_sensitivity: 0.003,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub panel_title: String,
    pub wireframe: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            panel_title: "Trigon".to_string(),
            wireframe: false,
        }
    }
}
