use glam::Vec3;

use crate::config::CameraConfig;

/// Read-only view of whatever camera drives the frame.
pub trait CameraView {
    fn position(&self) -> Vec3;
    fn look_vector(&self) -> Vec3;
    fn up_vector(&self) -> Vec3;
}

/// Per-frame movement request. Axes are in camera space and expected in
/// `-1.0..=1.0`; `look` is a raw pointer delta in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraInput {
    pub forward: f32,
    pub right: f32,
    pub up: f32,
    pub look: [f32; 2],
}

impl CameraInput {
    pub fn is_idle(&self) -> bool {
        self.forward == 0.0
            && self.right == 0.0
            && self.up == 0.0
            && self.look == [0.0, 0.0]
    }
}

const PITCH_LIMIT: f32 = 89.0 * std::f32::consts::PI / 180.0;

#[derive(Debug, Clone)]
pub struct FlyCamera {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    world_up: Vec3,
    move_speed: f32,
    look_sensitivity: f32,
}

impl FlyCamera {
    pub fn new(position: Vec3, look: Vec3, up: Vec3) -> Self {
        let look = look.normalize_or(Vec3::NEG_Z);
        let pitch = look.y.clamp(-1.0, 1.0).asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);
        let yaw = look.z.atan2(look.x);
        Self {
            position,
            yaw,
            pitch,
            world_up: up.normalize_or(Vec3::Y),
            move_speed: 5.0,
            look_sensitivity: 0.003,
        }
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        let mut camera = Self::new(
            Vec3::from_array(config.position),
            Vec3::from_array(config.look),
            Vec3::from_array(config.up),
        );
        camera.move_speed = config.move_speed;
        camera.look_sensitivity = config.look_sensitivity;
        camera
    }

    pub fn update(&mut self, input: &CameraInput, delta_time: f32) {
        if input.is_idle() {
            return;
        }

        self.yaw += input.look[0] * self.look_sensitivity;
        self.pitch = (self.pitch - input.look[1] * self.look_sensitivity)
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);

        let forward = self.look_vector();
        let right = forward.cross(self.world_up).normalize_or_zero();
        let step = self.move_speed * delta_time;
        self.position += forward * input.forward * step
            + right * input.right * step
            + self.world_up * input.up * step;
    }
}

impl CameraView for FlyCamera {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn look_vector(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
    }

    fn up_vector(&self) -> Vec3 {
        self.world_up
    }
}
