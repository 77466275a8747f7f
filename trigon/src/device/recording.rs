use std::cell::RefCell;
use std::rc::Rc;

use glam::Mat4;

use super::{
    BufferDesc, BufferKind, ClearValues, GraphicsDevice, IndexFormat, LayoutDesc, RasterState,
};
use crate::shader::{LinkedProgram, UniformLocation};
use crate::transform::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutId(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    CreateProgram {
        program: ProgramId,
        vertex_entry: String,
        fragment_entry: String,
    },
    CreateBuffer {
        buffer: BufferId,
        kind: BufferKind,
        label: String,
        bytes: usize,
    },
    CreateLayout {
        layout: LayoutId,
        /// `(slot, buffer, components, normalized, stride)`
        attributes: Vec<(u32, BufferId, u32, bool, u32)>,
        index_buffer: BufferId,
    },
    BeginPass {
        state: RasterState,
        clear: ClearValues,
    },
    UseProgram(ProgramId),
    WriteUniform {
        program: ProgramId,
        offset: u32,
        value: Mat4,
    },
    DrawIndexed {
        layout: LayoutId,
        index_count: u32,
        format: IndexFormat,
    },
    ReleaseProgram(ProgramId),
    ReleaseBuffer(BufferId),
    ReleaseLayout(LayoutId),
}

/// Shared view of everything a [`RecordingDevice`] was asked to do. Stays
/// readable after the device (and the renderer owning it) is dropped.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<DeviceCall>>>);

impl CallLog {
    pub fn calls(&self) -> Vec<DeviceCall> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn count(&self, predicate: impl Fn(&DeviceCall) -> bool) -> usize {
        self.0.borrow().iter().filter(|call| predicate(call)).count()
    }

    fn push(&self, call: DeviceCall) {
        self.0.borrow_mut().push(call);
    }
}

#[derive(Debug)]
pub struct RecordingDevice {
    log: CallLog,
    viewport: Viewport,
    next_id: u32,
    pending_error: Option<String>,
}

impl RecordingDevice {
    pub fn new(viewport: Viewport) -> (Self, CallLog) {
        let log = CallLog::default();
        let device = Self {
            log: log.clone(),
            viewport,
            next_id: 1,
            pending_error: None,
        };
        (device, log)
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Makes the next [`GraphicsDevice::check_error`] report `message`.
    pub fn inject_error(&mut self, message: impl Into<String>) {
        self.pending_error = Some(message.into());
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl GraphicsDevice for RecordingDevice {
    type Program = ProgramId;
    type Buffer = BufferId;
    type Layout = LayoutId;

    fn create_program(&mut self, program: &LinkedProgram) -> ProgramId {
        let id = ProgramId(self.next_id());
        self.log.push(DeviceCall::CreateProgram {
            program: id,
            vertex_entry: program.vertex.entry_point.clone(),
            fragment_entry: program.fragment.entry_point.clone(),
        });
        id
    }

    fn create_buffer(&mut self, desc: &BufferDesc<'_>) -> BufferId {
        let id = BufferId(self.next_id());
        self.log.push(DeviceCall::CreateBuffer {
            buffer: id,
            kind: desc.kind,
            label: desc.label.to_string(),
            bytes: desc.contents.len(),
        });
        id
    }

    fn create_layout(&mut self, desc: &LayoutDesc<'_, BufferId>) -> LayoutId {
        let id = LayoutId(self.next_id());
        self.log.push(DeviceCall::CreateLayout {
            layout: id,
            attributes: desc
                .attributes
                .iter()
                .map(|a| (a.slot, *a.buffer, a.components, a.normalized, a.stride))
                .collect(),
            index_buffer: *desc.index_buffer,
        });
        id
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn begin_pass(&mut self, state: &RasterState, clear: &ClearValues) {
        self.log.push(DeviceCall::BeginPass {
            state: *state,
            clear: *clear,
        });
    }

    fn use_program(&mut self, program: &ProgramId) {
        self.log.push(DeviceCall::UseProgram(*program));
    }

    fn write_uniform(&mut self, program: &ProgramId, location: UniformLocation, value: &Mat4) {
        self.log.push(DeviceCall::WriteUniform {
            program: *program,
            offset: location.offset,
            value: *value,
        });
    }

    fn draw_indexed(&mut self, layout: &LayoutId, index_count: u32, format: IndexFormat) {
        self.log.push(DeviceCall::DrawIndexed {
            layout: *layout,
            index_count,
            format,
        });
    }

    fn check_error(&mut self) -> Option<String> {
        self.pending_error.take()
    }

    fn release_program(&mut self, program: ProgramId) {
        self.log.push(DeviceCall::ReleaseProgram(program));
    }

    fn release_buffer(&mut self, buffer: BufferId) {
        self.log.push(DeviceCall::ReleaseBuffer(buffer));
    }

    fn release_layout(&mut self, layout: LayoutId) {
        self.log.push(DeviceCall::ReleaseLayout(layout));
    }
}
