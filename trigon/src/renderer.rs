use std::path::Path;

use crate::camera::CameraView;
use crate::config::{AssetPaths, OverlayConfig, ProjectionConfig};
use crate::device::{
    BufferDesc, BufferKind, ClearValues, FillMode, GraphicsDevice, IndexFormat, LayoutDesc,
    RasterState, VertexAttribute,
};
use crate::error::{RenderError, RenderResult};
use crate::model::{MeshData, ModelSource};
use crate::overlay::{self, RenderSettings};
use crate::shader::{self, StageKind, UniformTable};
use crate::transform::FrameTransforms;

const POSITION_SLOT: u32 = 0;
const NORMAL_SLOT: u32 = 1;

pub const COMBINED_XFORM: &str = "combined_xform";
pub const MODEL_XFORM: &str = "model_xform";

struct ShaderProgram<D: GraphicsDevice> {
    handle: D::Program,
    uniforms: UniformTable,
}

/// GPU-resident streams of one mesh and the layout that binds them.
struct MeshBuffer<D: GraphicsDevice> {
    name: String,
    position: D::Buffer,
    normal: D::Buffer,
    index: D::Buffer,
    layout: D::Layout,
    index_count: u32,
}

/// Owns the shader program and every mesh buffer for its whole lifetime
/// and draws them once per frame. Everything it created is released
/// through the device when it is dropped.
pub struct FrameRenderer<D: GraphicsDevice> {
    device: D,
    program: Option<ShaderProgram<D>>,
    meshes: Vec<MeshBuffer<D>>,
    settings: RenderSettings,
    projection: ProjectionConfig,
    panel_title: String,
}

impl<D: GraphicsDevice> FrameRenderer<D> {
    pub fn new(device: D, projection: ProjectionConfig, overlay: &OverlayConfig) -> Self {
        Self {
            device,
            program: None,
            meshes: Vec::new(),
            settings: RenderSettings {
                wireframe: overlay.wireframe,
            },
            projection,
            panel_title: overlay.panel_title.clone(),
        }
    }

    /// Creates the program, then uploads the model. Stops at the first failure.
    pub fn setup(&mut self, assets: &AssetPaths, loader: &impl ModelSource) -> RenderResult<()> {
        self.create_program(&assets.vertex_shader, &assets.fragment_shader)?;
        self.initialise_geometry(loader, &assets.model)
    }

    pub fn create_program(
        &mut self,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> RenderResult<()> {
        let vertex = shader::compile_stage(StageKind::Vertex, vertex_path);
        let fragment = shader::compile_stage(StageKind::Fragment, fragment_path);
        let (vertex, fragment) = match (vertex, fragment) {
            (Ok(vertex), Ok(fragment)) => (vertex, fragment),
            (Err(err), _) | (_, Err(err)) => {
                tracing::error!(target: "shader", %err, "shader compilation failed");
                return Err(err);
            }
        };

        let linked = shader::link(vertex, fragment).inspect_err(|err| {
            tracing::error!(target: "shader", %err, "program link failed");
        })?;

        let handle = self.device.create_program(&linked);
        if let Some(diagnostic) = self.device.check_error() {
            tracing::error!(target: "gpu", %diagnostic, "GPU error after program creation");
            self.device.release_program(handle);
            return Err(RenderError::Device {
                context: "creating the shader program",
                diagnostic,
            });
        }

        if let Some(previous) = self.program.take() {
            self.device.release_program(previous.handle);
        }
        tracing::info!(
            target: "renderer",
            vertex_entry = %linked.vertex.entry_point,
            fragment_entry = %linked.fragment.entry_point,
            "shader program ready"
        );
        self.program = Some(ShaderProgram {
            handle,
            uniforms: linked.uniforms,
        });
        Ok(())
    }

    pub fn initialise_geometry(
        &mut self,
        loader: &impl ModelSource,
        path: impl AsRef<Path>,
    ) -> RenderResult<()> {
        if self.program.is_none() {
            return Err(RenderError::ProgramMissing);
        }

        let path = path.as_ref();
        let model = loader.load(path).map_err(|source| {
            tracing::error!(target: "geometry", path = %path.display(), %source, "model load failed");
            RenderError::ModelLoad {
                path: path.to_path_buf(),
                source,
            }
        })?;

        self.release_meshes();
        for mesh in &model.meshes {
            let uploaded = self.upload_mesh(mesh);
            self.meshes.push(uploaded);
        }

        // Diagnostic only: upload errors never fail setup.
        if let Some(diagnostic) = self.device.check_error() {
            tracing::error!(target: "gpu", %diagnostic, "GPU error after geometry upload");
        }

        tracing::info!(
            target: "geometry",
            path = %path.display(),
            meshes = self.meshes.len(),
            indices = self.meshes.iter().map(|m| m.index_count as u64).sum::<u64>(),
            "geometry uploaded"
        );
        Ok(())
    }

    fn upload_mesh(&mut self, mesh: &MeshData) -> MeshBuffer<D> {
        if mesh.normals.len() != mesh.positions.len() {
            tracing::warn!(
                target: "geometry",
                mesh = %mesh.name,
                positions = mesh.positions.len(),
                normals = mesh.normals.len(),
                "normal stream does not match position stream"
            );
        }

        let position = self.device.create_buffer(&BufferDesc {
            label: "positions",
            kind: BufferKind::Vertex,
            contents: bytemuck::cast_slice(&mesh.positions),
        });
        let normal = self.device.create_buffer(&BufferDesc {
            label: "normals",
            kind: BufferKind::Vertex,
            contents: bytemuck::cast_slice(&mesh.normals),
        });
        let index = self.device.create_buffer(&BufferDesc {
            label: "indices",
            kind: BufferKind::Index,
            contents: bytemuck::cast_slice(&mesh.indices),
        });

        let attributes = [
            VertexAttribute {
                slot: POSITION_SLOT,
                buffer: &position,
                components: 3,
                normalized: false,
                stride: 0,
            },
            VertexAttribute {
                slot: NORMAL_SLOT,
                buffer: &normal,
                components: 3,
                normalized: false,
                stride: 0,
            },
        ];
        let layout = self.device.create_layout(&LayoutDesc {
            label: &mesh.name,
            attributes: &attributes,
            index_buffer: &index,
        });

        tracing::debug!(
            target: "geometry",
            mesh = %mesh.name,
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "mesh uploaded"
        );

        MeshBuffer {
            name: mesh.name.clone(),
            position,
            normal,
            index,
            layout,
            index_count: mesh.indices.len() as u32,
        }
    }

    /// Draws every uploaded mesh from `camera`. GPU errors are logged and the
    /// next frame proceeds as usual.
    pub fn render(&mut self, camera: &impl CameraView, delta_time: f32) {
        let fill = if self.settings.wireframe {
            FillMode::Wireframe
        } else {
            FillMode::Solid
        };
        self.device.begin_pass(
            &RasterState {
                depth_test: true,
                cull_back_faces: true,
                fill,
            },
            &ClearValues::OPAQUE_BLACK,
        );

        let transforms = FrameTransforms::compute(self.device.viewport(), camera, &self.projection);

        let Some(program) = &self.program else {
            tracing::warn!(target: "renderer", "render called before a program was created");
            return;
        };

        self.device.use_program(&program.handle);
        for (name, value) in [
            (COMBINED_XFORM, &transforms.combined),
            (MODEL_XFORM, &transforms.model),
        ] {
            match program.uniforms.location(name) {
                Some(location) => self.device.write_uniform(&program.handle, location, value),
                None => tracing::trace!(target: "renderer", uniform = name, "program has no such uniform"),
            }
        }

        for mesh in &self.meshes {
            self.device
                .draw_indexed(&mesh.layout, mesh.index_count, IndexFormat::U32);
        }

        if let Some(diagnostic) = self.device.check_error() {
            tracing::error!(target: "gpu", %diagnostic, "GPU error during frame draw");
        }

        tracing::trace!(
            target: "renderer",
            delta_time,
            meshes = self.meshes.len(),
            ?fill,
            "frame drawn"
        );
    }

    pub fn define_gui(&mut self, ctx: &egui::Context) {
        overlay::define_gui(ctx, &self.panel_title, &mut self.settings);
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut RenderSettings {
        &mut self.settings
    }

    pub fn has_program(&self) -> bool {
        self.program.is_some()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    fn release_meshes(&mut self) {
        for mesh in self.meshes.drain(..) {
            tracing::trace!(target: "geometry", mesh = %mesh.name, "releasing mesh buffers");
            self.device.release_layout(mesh.layout);
            self.device.release_buffer(mesh.position);
            self.device.release_buffer(mesh.normal);
            self.device.release_buffer(mesh.index);
        }
    }
}

impl<D: GraphicsDevice> Drop for FrameRenderer<D> {
    fn drop(&mut self) {
        self.release_meshes();
        if let Some(program) = self.program.take() {
            self.device.release_program(program.handle);
        }
        tracing::debug!(target: "renderer", "GPU resources released");
    }
}
