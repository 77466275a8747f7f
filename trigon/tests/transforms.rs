use glam::{Mat4, Vec3, Vec4};
use trigon::config::ProjectionConfig;
use trigon::transform::{FrameTransforms, Viewport, projection_matrix, view_matrix};

mod common;
use common::FixedCamera;

fn reference_perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y / 2.0).tan();
    Mat4::from_cols(
        Vec4::new(f / aspect, 0.0, 0.0, 0.0),
        Vec4::new(0.0, f, 0.0, 0.0),
        Vec4::new(0.0, 0.0, far / (near - far), -1.0),
        Vec4::new(0.0, 0.0, near * far / (near - far), 0.0),
    )
}

fn reference_look_at(eye: Vec3, center: Vec3, up: Vec3) -> Mat4 {
    let f = (center - eye).normalize();
    let s = f.cross(up).normalize();
    let u = s.cross(f);
    Mat4::from_cols(
        Vec4::new(s.x, u.x, -f.x, 0.0),
        Vec4::new(s.y, u.y, -f.y, 0.0),
        Vec4::new(s.z, u.z, -f.z, 0.0),
        Vec4::new(-s.dot(eye), -u.dot(eye), f.dot(eye), 1.0),
    )
}

#[test]
fn test_aspect_ratio_is_plain_division() {
    for (w, h) in [(1280u32, 720u32), (1, 1), (800, 600), (333, 1000), (4096, 7)] {
        let viewport = Viewport::new(w, h);
        assert_eq!(viewport.aspect_ratio(), w as f32 / h as f32, "viewport {w}x{h}");
    }
}

#[test]
fn test_projection_matches_perspective_formula() {
    let config = ProjectionConfig::default();
    for (w, h) in [(1280u32, 720u32), (600, 800), (1, 1)] {
        let aspect = Viewport::new(w, h).aspect_ratio();
        let actual = projection_matrix(aspect, &config);
        let expected = reference_perspective(45f32.to_radians(), aspect, 1.0, 4000.0);
        assert!(
            actual.abs_diff_eq(expected, 1e-5),
            "projection for {w}x{h}:\n{actual:?}\nexpected\n{expected:?}"
        );
    }
}

#[test]
fn test_view_matrix_is_look_at_from_camera() {
    let cameras = [
        FixedCamera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, Vec3::Y),
        FixedCamera::new(Vec3::new(10.0, 3.0, -2.0), Vec3::new(-1.0, -0.2, 0.5), Vec3::Y),
        FixedCamera::new(Vec3::new(-4.0, 8.0, 1.5), Vec3::new(0.3, -1.0, 0.1), Vec3::Z),
        FixedCamera::new(Vec3::new(100.0, -50.0, 25.0), Vec3::X, Vec3::new(0.0, 0.6, 0.8)),
    ];
    for camera in cameras {
        let expected =
            reference_look_at(camera.position, camera.position + camera.look, camera.up);
        let actual = view_matrix(&camera);
        assert!(
            actual.abs_diff_eq(expected, 1e-4),
            "view for {camera:?}:\n{actual:?}\nexpected\n{expected:?}"
        );
    }
}

#[test]
fn test_combined_is_projection_after_view_and_model_is_identity() {
    let camera = FixedCamera::new(Vec3::new(1.0, 2.0, 3.0), Vec3::NEG_Z, Vec3::Y);
    let transforms =
        FrameTransforms::compute(Viewport::new(640, 480), &camera, &ProjectionConfig::default());

    assert_eq!(transforms.combined, transforms.projection * transforms.view);
    assert_eq!(transforms.model, Mat4::IDENTITY);

    // A point straight ahead of the camera lands in the centre of clip space.
    let ahead = transforms.combined * Vec4::new(1.0, 2.0, -7.0, 1.0);
    let ndc = ahead / ahead.w;
    assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
    assert!((0.0..=1.0).contains(&ndc.z), "depth {} outside [0, 1]", ndc.z);
}
