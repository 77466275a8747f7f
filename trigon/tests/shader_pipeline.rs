use trigon::error::RenderError;
use trigon::shader::{StageKind, UniformType, compile_source, compile_stage, link};

mod common;
use common::{FRAGMENT_SHADER, VERTEX_SHADER};

const PASS_THROUGH_FRAGMENT: &str = "
@fragment
fn fs_main(@location(0) varying_normal: vec3<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(varying_normal, 1.0);
}
";

#[test]
fn test_bundled_shaders_compile_and_link() {
    let vertex = compile_stage(StageKind::Vertex, VERTEX_SHADER).expect("vertex shader");
    let fragment = compile_stage(StageKind::Fragment, FRAGMENT_SHADER).expect("fragment shader");
    assert_eq!(vertex.entry_point, "vs_main");
    assert_eq!(fragment.entry_point, "fs_main");

    let program = link(vertex, fragment).expect("bundled program should link");
    let combined = program.uniforms.location("combined_xform").expect("combined_xform");
    let model = program.uniforms.location("model_xform").expect("model_xform");
    assert_eq!(combined.offset, 0);
    assert_eq!(model.offset, 64);
    assert_eq!(program.uniforms.size, 128);
    assert!(program.uniforms.entries.iter().all(|e| e.ty == UniformType::Mat4));
}

#[test]
fn test_malformed_source_is_a_compile_failure() {
    let result = compile_source(
        StageKind::Vertex,
        "broken.wgsl",
        "@vertex fn vs_main( -> @builtin(position) vec4<f32> { return; }".to_string(),
    );
    match result {
        Err(RenderError::ShaderCompile { stage, diagnostic, .. }) => {
            assert_eq!(stage, StageKind::Vertex);
            assert!(!diagnostic.is_empty());
        }
        other => panic!("expected compile failure, got {other:?}"),
    }
}

#[test]
fn test_type_error_is_caught_by_validation() {
    let result = compile_source(
        StageKind::Fragment,
        "bad_types.wgsl",
        "@fragment fn fs_main() -> @location(0) vec4<f32> { let x: f32 = 1.0; return x; }"
            .to_string(),
    );
    assert!(matches!(result, Err(RenderError::ShaderCompile { .. })));
}

#[test]
fn test_missing_stage_entry_point_is_a_compile_failure() {
    let result = compile_source(
        StageKind::Vertex,
        "fragment_only.wgsl",
        PASS_THROUGH_FRAGMENT.to_string(),
    );
    match result {
        Err(RenderError::ShaderCompile { diagnostic, .. }) => {
            assert!(diagnostic.contains("vertex"), "diagnostic: {diagnostic}");
        }
        other => panic!("expected compile failure, got {other:?}"),
    }
}

#[test]
fn test_missing_file_is_a_compile_failure() {
    let result = compile_stage(StageKind::Fragment, "no/such/shader.wgsl");
    assert!(matches!(
        result,
        Err(RenderError::ShaderCompile {
            stage: StageKind::Fragment,
            ..
        })
    ));
}

#[test]
fn test_fragment_input_without_vertex_output_fails_to_link() {
    let vertex = compile_stage(StageKind::Vertex, VERTEX_SHADER).unwrap();
    let fragment = compile_source(
        StageKind::Fragment,
        "needs_uv.wgsl",
        "
@fragment
fn fs_main(@location(3) uv: vec2<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(uv, 0.0, 1.0);
}
"
        .to_string(),
    )
    .unwrap();

    match link(vertex, fragment) {
        Err(RenderError::Link(message)) => assert!(message.contains("location 3"), "{message}"),
        other => panic!("expected link failure, got {other:?}"),
    }
}

#[test]
fn test_varying_type_mismatch_fails_to_link() {
    let vertex = compile_stage(StageKind::Vertex, VERTEX_SHADER).unwrap();
    let fragment = compile_source(
        StageKind::Fragment,
        "vec4_normal.wgsl",
        "
@fragment
fn fs_main(@location(0) varying_normal: vec4<f32>) -> @location(0) vec4<f32> {
    return varying_normal;
}
"
        .to_string(),
    )
    .unwrap();

    assert!(matches!(link(vertex, fragment), Err(RenderError::Link(_))));
}

#[test]
fn test_disagreeing_uniform_blocks_fail_to_link() {
    let vertex = compile_stage(StageKind::Vertex, VERTEX_SHADER).unwrap();
    let fragment = compile_source(
        StageKind::Fragment,
        "tint.wgsl",
        "
struct Tint {
    color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> tint: Tint;

@fragment
fn fs_main(@location(0) varying_normal: vec3<f32>) -> @location(0) vec4<f32> {
    return tint.color * vec4<f32>(varying_normal, 1.0);
}
"
        .to_string(),
    )
    .unwrap();

    assert!(matches!(link(vertex, fragment), Err(RenderError::Link(_))));
}

#[test]
fn test_vertex_input_outside_mesh_layout_fails_to_link() {
    let vertex = compile_source(
        StageKind::Vertex,
        "wants_uv.wgsl",
        "
@vertex
fn vs_main(@location(0) p: vec3<f32>, @location(2) uv: vec2<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(p + vec3<f32>(uv, 0.0), 1.0);
}
"
        .to_string(),
    )
    .unwrap();
    let fragment = compile_source(
        StageKind::Fragment,
        "flat.wgsl",
        "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }".to_string(),
    )
    .unwrap();

    match link(vertex, fragment) {
        Err(RenderError::Link(message)) => assert!(message.contains("location 2"), "{message}"),
        other => panic!("expected link failure, got {other:?}"),
    }
}

#[test]
fn test_stages_in_the_wrong_order_fail_to_link() {
    let vertex = compile_stage(StageKind::Vertex, VERTEX_SHADER).unwrap();
    let fragment = compile_stage(StageKind::Fragment, FRAGMENT_SHADER).unwrap();
    assert!(matches!(link(fragment, vertex), Err(RenderError::Link(_))));
}
