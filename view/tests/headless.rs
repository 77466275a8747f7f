use std::path::PathBuf;

use trigon::RenderSettings;
use trigon::device::{
    BufferDesc, BufferKind, ClearValues, FillMode, GraphicsDevice, IndexFormat, LayoutDesc,
    RasterState, VertexAttribute,
};
use trigon::overlay;
use trigon::shader::{self, StageKind};
use trigon_view::WgpuDevice;

/// Machines without any adapter skip these tests.
fn headless_device() -> Option<WgpuDevice> {
    match pollster::block_on(WgpuDevice::headless(64, 64)) {
        Ok(device) => Some(device),
        Err(err) => {
            eprintln!("no GPU adapter available, skipping: {err:#}");
            None
        }
    }
}

fn asset(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../assets")
        .join(relative)
}

const SOLID: RasterState = RasterState {
    depth_test: true,
    cull_back_faces: true,
    fill: FillMode::Solid,
};

#[test]
fn test_draw_errors_are_reported_by_the_check_after_the_draw() {
    let Some(mut device) = headless_device() else {
        return;
    };

    let vertex = shader::compile_stage(StageKind::Vertex, asset("shaders/vertex_shader.wgsl"))
        .expect("bundled vertex shader compiles");
    let fragment =
        shader::compile_stage(StageKind::Fragment, asset("shaders/fragment_shader.wgsl"))
            .expect("bundled fragment shader compiles");
    let linked = shader::link(vertex, fragment).expect("bundled shaders link");
    let program = device.create_program(&linked);

    let positions: [[f32; 3]; 3] = [[-0.5, -0.5, 0.0], [0.5, -0.5, 0.0], [0.0, 0.5, 0.0]];
    let normals: [[f32; 3]; 3] = [[0.0, 0.0, 1.0]; 3];
    let indices: [u32; 3] = [0, 1, 2];
    let position = device.create_buffer(&BufferDesc {
        label: "positions",
        kind: BufferKind::Vertex,
        contents: bytemuck::cast_slice(&positions),
    });
    let normal = device.create_buffer(&BufferDesc {
        label: "normals",
        kind: BufferKind::Vertex,
        contents: bytemuck::cast_slice(&normals),
    });
    let index = device.create_buffer(&BufferDesc {
        label: "indices",
        kind: BufferKind::Index,
        contents: bytemuck::cast_slice(&indices),
    });
    let attributes = [
        VertexAttribute {
            slot: 0,
            buffer: &position,
            components: 3,
            normalized: false,
            stride: 0,
        },
        VertexAttribute {
            slot: 1,
            buffer: &normal,
            components: 3,
            normalized: false,
            stride: 0,
        },
    ];
    let layout = device.create_layout(&LayoutDesc {
        label: "triangle",
        attributes: &attributes,
        index_buffer: &index,
    });
    assert_eq!(device.check_error(), None, "resource creation should be clean");

    // Ten times more indices than the buffer holds.
    device.begin_pass(&SOLID, &ClearValues::OPAQUE_BLACK);
    device.use_program(&program);
    device.draw_indexed(&layout, 30, IndexFormat::U32);
    assert!(
        device.check_error().is_some(),
        "an out-of-range draw should be caught by the check that follows it"
    );

    device.begin_pass(&SOLID, &ClearValues::OPAQUE_BLACK);
    device.use_program(&program);
    device.draw_indexed(&layout, 3, IndexFormat::U32);
    assert_eq!(
        device.check_error(),
        None,
        "a valid frame should not inherit the previous frame's error"
    );
    device.present(None).expect("offscreen frames always present");
}

#[test]
fn test_overlay_textures_upload_without_presenting_a_frame() {
    let Some(device) = headless_device() else {
        return;
    };

    let ctx = egui::Context::default();
    let mut settings = RenderSettings::default();
    let output = ctx.run(egui::RawInput::default(), |ctx| {
        overlay::define_gui(ctx, "Trigon", &mut settings)
    });
    assert!(
        !output.textures_delta.set.is_empty(),
        "the first egui frame should carry the font atlas"
    );

    let mut renderer = egui_wgpu::Renderer::new(
        device.device(),
        device.surface_format(),
        egui_wgpu::RendererOptions::default(),
    );
    device.upload_overlay_textures(&mut renderer, &output.textures_delta);

    for (id, _) in &output.textures_delta.set {
        assert!(
            renderer.texture(id).is_some(),
            "texture {id:?} should be resident before any frame is presented"
        );
    }
}
