//! The seam between frame orchestration and a concrete GPU API.
//!
//! [`FrameRenderer`](crate::FrameRenderer) only talks to a
//! [`GraphicsDevice`]. The window frontend supplies a wgpu implementation;
//! [`RecordingDevice`] records calls for headless use.

mod recording;

use glam::Mat4;

use crate::shader::{LinkedProgram, UniformLocation};
use crate::transform::Viewport;

pub use recording::{BufferId, CallLog, DeviceCall, LayoutId, ProgramId, RecordingDevice};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillMode {
    #[default]
    Solid,
    Wireframe,
}

/// Fixed-function state applied at the start of a frame. Both faces use
/// the same fill mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterState {
    pub depth_test: bool,
    pub cull_back_faces: bool,
    pub fill: FillMode,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearValues {
    pub color: [f32; 4],
    pub depth: f32,
}

impl ClearValues {
    pub const OPAQUE_BLACK: Self = Self {
        color: [0.0, 0.0, 0.0, 1.0],
        depth: 1.0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    Vertex,
    Index,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    U16,
    U32,
}

#[derive(Debug, Clone, Copy)]
pub struct BufferDesc<'a> {
    pub label: &'a str,
    pub kind: BufferKind,
    pub contents: &'a [u8],
}

/// One float attribute stream read from its own buffer. A `stride` of
/// zero means tightly packed.
#[derive(Debug)]
pub struct VertexAttribute<'a, B> {
    pub slot: u32,
    pub buffer: &'a B,
    pub components: u32,
    pub normalized: bool,
    pub stride: u32,
}

/// Attribute streams plus the index buffer they are drawn with.
#[derive(Debug)]
pub struct LayoutDesc<'a, B> {
    pub label: &'a str,
    pub attributes: &'a [VertexAttribute<'a, B>],
    pub index_buffer: &'a B,
}

pub trait GraphicsDevice {
    type Program;
    type Buffer;
    type Layout;

    fn create_program(&mut self, program: &LinkedProgram) -> Self::Program;
    fn create_buffer(&mut self, desc: &BufferDesc<'_>) -> Self::Buffer;
    fn create_layout(&mut self, desc: &LayoutDesc<'_, Self::Buffer>) -> Self::Layout;

    fn viewport(&self) -> Viewport;

    /// Applies raster state and clears color and depth.
    fn begin_pass(&mut self, state: &RasterState, clear: &ClearValues);
    fn use_program(&mut self, program: &Self::Program);
    fn write_uniform(&mut self, program: &Self::Program, location: UniformLocation, value: &Mat4);
    fn draw_indexed(&mut self, layout: &Self::Layout, index_count: u32, format: IndexFormat);

    /// Returns and clears the first GPU error raised since the last check.
    fn check_error(&mut self) -> Option<String>;

    fn release_program(&mut self, program: Self::Program);
    fn release_buffer(&mut self, buffer: Self::Buffer);
    fn release_layout(&mut self, layout: Self::Layout);
}
