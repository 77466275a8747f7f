use glam::Mat4;

use crate::camera::CameraView;
use crate::config::ProjectionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Plain float division; a zero height yields inf/NaN and is not guarded.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Right-handed perspective with clip-space depth in `[0, 1]`.
pub fn projection_matrix(aspect_ratio: f32, projection: &ProjectionConfig) -> Mat4 {
    Mat4::perspective_rh(
        projection.fov_y_degrees.to_radians(),
        aspect_ratio,
        projection.near,
        projection.far,
    )
}

pub fn view_matrix(camera: &impl CameraView) -> Mat4 {
    let eye = camera.position();
    Mat4::look_at_rh(eye, eye + camera.look_vector(), camera.up_vector())
}

/// Transform chain for one frame. Rebuilt every frame, never cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransforms {
    pub projection: Mat4,
    pub view: Mat4,
    pub combined: Mat4,
    pub model: Mat4,
}

impl FrameTransforms {
    pub fn compute(
        viewport: Viewport,
        camera: &impl CameraView,
        projection: &ProjectionConfig,
    ) -> Self {
        let projection = projection_matrix(viewport.aspect_ratio(), projection);
        let view = view_matrix(camera);
        Self {
            projection,
            view,
            combined: projection * view,
            model: Mat4::IDENTITY,
        }
    }
}
