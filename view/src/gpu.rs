use std::sync::Arc;

use anyhow::{Context, Result};
use glam::Mat4;
use trigon::device::{
    BufferDesc, BufferKind, ClearValues, FillMode, GraphicsDevice, IndexFormat, LayoutDesc,
    RasterState,
};
use trigon::shader::{LinkedProgram, UniformLocation};
use trigon::transform::Viewport;
use wgpu::SurfaceError;
use wgpu::util::DeviceExt;
use winit::{dpi::PhysicalSize, window::Window};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
const VEC3_STRIDE: wgpu::BufferAddress = std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress;
const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const NORMAL_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];

/// Pipelines and uniform storage for one linked program. Depth testing
/// and back-face culling are baked into both pipelines.
#[derive(Clone)]
pub struct WgpuProgram {
    solid: wgpu::RenderPipeline,
    wireframe: Option<wgpu::RenderPipeline>,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

#[derive(Clone)]
pub struct WgpuLayout {
    vertex_buffers: Vec<(u32, wgpu::Buffer)>,
    index_buffer: wgpu::Buffer,
}

struct DrawCommand {
    program: WgpuProgram,
    layout: WgpuLayout,
    index_count: u32,
    format: wgpu::IndexFormat,
}

/// Commands recorded since `begin_pass` and not yet submitted.
struct PendingFrame {
    raster: RasterState,
    clear: ClearValues,
    program: Option<WgpuProgram>,
    draws: Vec<DrawCommand>,
}

/// Where finished frames go.
enum Presenter {
    Window(wgpu::Surface<'static>),
    Offscreen(wgpu::Texture),
}

/// Color target of the frame in flight.
struct FrameTarget {
    surface_texture: Option<wgpu::SurfaceTexture>,
    view: wgpu::TextureView,
}

/// egui output to composite over the scene.
pub struct OverlayFrame<'a> {
    pub renderer: &'a mut egui_wgpu::Renderer,
    pub primitives: &'a [egui::ClippedPrimitive],
    pub screen: &'a egui_wgpu::ScreenDescriptor,
}

pub struct WgpuDevice {
    presenter: Presenter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    wireframe_supported: bool,
    wireframe_warned: bool,
    frame: Option<PendingFrame>,
    target: Option<FrameTarget>,
    acquire_error: Option<SurfaceError>,
}

impl WgpuDevice {
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();
        let instance = create_instance();
        let surface = instance
            .create_surface(window)
            .context("failed to create surface")?;
        let adapter = request_adapter(&instance, Some(&surface)).await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = pick_surface_format(&surface_caps.formats)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = surface_config(format, alpha_mode, size.width, size.height);

        let (device, queue, wireframe_supported) = request_device(&adapter).await?;
        surface.configure(&device, &config);

        Ok(Self::assemble(
            Presenter::Window(surface),
            device,
            queue,
            config,
            wireframe_supported,
        ))
    }

    /// A device that renders into an offscreen texture instead of a window.
    pub async fn headless(width: u32, height: u32) -> Result<Self> {
        let instance = create_instance();
        let adapter = request_adapter(&instance, None).await?;
        let (device, queue, wireframe_supported) = request_device(&adapter).await?;
        let config = surface_config(
            OFFSCREEN_FORMAT,
            wgpu::CompositeAlphaMode::Opaque,
            width,
            height,
        );
        let texture = create_offscreen_texture(&device, &config);

        Ok(Self::assemble(
            Presenter::Offscreen(texture),
            device,
            queue,
            config,
            wireframe_supported,
        ))
    }

    fn assemble(
        presenter: Presenter,
        device: wgpu::Device,
        queue: wgpu::Queue,
        config: wgpu::SurfaceConfiguration,
        wireframe_supported: bool,
    ) -> Self {
        let depth_view = create_depth_view(&device, &config);

        // Always keep a scope open so check_error has something to pop.
        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        tracing::info!(
            target: "gpu",
            format = ?config.format,
            width = config.width,
            height = config.height,
            headless = matches!(presenter, Presenter::Offscreen(_)),
            wireframe_supported,
            "GPU device ready"
        );

        Self {
            presenter,
            device,
            queue,
            config,
            depth_view,
            wireframe_supported,
            wireframe_warned: false,
            frame: None,
            target: None,
            acquire_error: None,
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.target = None;
        match &mut self.presenter {
            Presenter::Window(surface) => surface.configure(&self.device, &self.config),
            Presenter::Offscreen(texture) => {
                *texture = create_offscreen_texture(&self.device, &self.config);
            }
        }
        self.depth_view = create_depth_view(&self.device, &self.config);
        tracing::debug!(target: "gpu", width = new_size.width, height = new_size.height, "surface resized");
    }

    /// Uploads new egui textures. Deltas arrive once, so this runs every
    /// frame whether or not the frame reaches the screen.
    pub fn upload_overlay_textures(
        &self,
        renderer: &mut egui_wgpu::Renderer,
        textures: &egui::TexturesDelta,
    ) {
        for (id, delta) in &textures.set {
            renderer.update_texture(&self.device, &self.queue, *id, delta);
        }
    }

    /// Composites the overlay over the submitted scene and presents. Errors
    /// raised by the overlay pass are logged here.
    pub fn present(&mut self, mut overlay: Option<OverlayFrame<'_>>) -> Result<(), SurfaceError> {
        self.submit_scene();
        if let Some(err) = self.acquire_error.take() {
            return Err(err);
        }
        let (target, scene_drawn) = match self.target.take() {
            Some(target) => (target, true),
            None => (self.acquire_target()?, false),
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("trigon-overlay-encoder"),
            });

        let mut command_buffers = Vec::new();
        if let Some(overlay) = overlay.as_mut() {
            command_buffers = overlay.renderer.update_buffers(
                &self.device,
                &self.queue,
                &mut encoder,
                overlay.primitives,
                overlay.screen,
            );
        }
        let load = if scene_drawn {
            wgpu::LoadOp::Load
        } else {
            wgpu::LoadOp::Clear(wgpu::Color::BLACK)
        };
        {
            let mut gui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("trigon-overlay-pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &target.view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();
            if let Some(overlay) = overlay.as_ref() {
                overlay
                    .renderer
                    .render(&mut gui_pass, overlay.primitives, overlay.screen);
            }
        }

        self.queue
            .submit(command_buffers.into_iter().chain(std::iter::once(encoder.finish())));
        if let Some(surface_texture) = target.surface_texture {
            surface_texture.present();
        }

        if let Some(diagnostic) = self.pop_errors() {
            tracing::error!(target: "gpu", %diagnostic, "GPU error while compositing the overlay");
        }
        Ok(())
    }

    fn acquire_target(&self) -> Result<FrameTarget, SurfaceError> {
        match &self.presenter {
            Presenter::Window(surface) => {
                let surface_texture = surface.get_current_texture()?;
                let view = surface_texture
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                Ok(FrameTarget {
                    surface_texture: Some(surface_texture),
                    view,
                })
            }
            Presenter::Offscreen(texture) => Ok(FrameTarget {
                surface_texture: None,
                view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            }),
        }
    }

    /// Encodes and submits the recorded scene so its errors land in the
    /// currently open error scopes.
    fn submit_scene(&mut self) {
        let Some(frame) = self.frame.take() else {
            return;
        };
        if self.target.is_none() {
            match self.acquire_target() {
                Ok(target) => self.target = Some(target),
                Err(err) => {
                    self.acquire_error = Some(err);
                    return;
                }
            }
        }

        let wants_wireframe = frame.raster.fill == FillMode::Wireframe;
        if wants_wireframe
            && !self.wireframe_warned
            && frame.draws.iter().any(|draw| draw.program.wireframe.is_none())
        {
            tracing::warn!(target: "gpu", "adapter lacks POLYGON_MODE_LINE, drawing wireframe as solid");
            self.wireframe_warned = true;
        }

        let Some(target) = self.target.as_ref() else {
            return;
        };
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("trigon-scene-encoder"),
            });

        {
            let [r, g, b, a] = frame.clear.color.map(f64::from);
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("trigon-scene-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(frame.clear.depth),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            for draw in &frame.draws {
                let pipeline = match (&draw.program.wireframe, wants_wireframe) {
                    (Some(wireframe), true) => wireframe,
                    _ => &draw.program.solid,
                };
                pass.set_pipeline(pipeline);
                pass.set_bind_group(0, &draw.program.bind_group, &[]);
                for (slot, buffer) in &draw.layout.vertex_buffers {
                    pass.set_vertex_buffer(*slot, buffer.slice(..));
                }
                pass.set_index_buffer(draw.layout.index_buffer.slice(..), draw.format);
                pass.draw_indexed(0..draw.index_count, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn pop_errors(&self) -> Option<String> {
        let validation = pollster::block_on(self.device.pop_error_scope());
        let out_of_memory = pollster::block_on(self.device.pop_error_scope());
        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        validation.or(out_of_memory).map(|err| err.to_string())
    }

    fn create_pipeline(
        &self,
        program: &LinkedProgram,
        layout: &wgpu::PipelineLayout,
        vertex: &wgpu::ShaderModule,
        fragment: &wgpu::ShaderModule,
        polygon_mode: wgpu::PolygonMode,
    ) -> wgpu::RenderPipeline {
        let label = match polygon_mode {
            wgpu::PolygonMode::Line => "trigon-wireframe-pipeline",
            _ => "trigon-solid-pipeline",
        };
        self.device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(layout),
                cache: None,
                vertex: wgpu::VertexState {
                    module: vertex,
                    entry_point: Some(&program.vertex.entry_point),
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    buffers: &[
                        wgpu::VertexBufferLayout {
                            array_stride: VEC3_STRIDE,
                            step_mode: wgpu::VertexStepMode::Vertex,
                            attributes: &POSITION_ATTRIBUTES,
                        },
                        wgpu::VertexBufferLayout {
                            array_stride: VEC3_STRIDE,
                            step_mode: wgpu::VertexStepMode::Vertex,
                            attributes: &NORMAL_ATTRIBUTES,
                        },
                    ],
                },
                fragment: Some(wgpu::FragmentState {
                    module: fragment,
                    entry_point: Some(&program.fragment.entry_point),
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.config.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Back),
                    unclipped_depth: false,
                    polygon_mode,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
            })
    }
}

impl GraphicsDevice for WgpuDevice {
    type Program = WgpuProgram;
    type Buffer = wgpu::Buffer;
    type Layout = WgpuLayout;

    fn create_program(&mut self, program: &LinkedProgram) -> WgpuProgram {
        let vertex = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&program.vertex.label),
                source: wgpu::ShaderSource::Wgsl(program.vertex.source.as_str().into()),
            });
        let fragment = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&program.fragment.label),
                source: wgpu::ShaderSource::Wgsl(program.fragment.source.as_str().into()),
            });

        let uniform_size = program.uniforms.size.max(16).next_multiple_of(16);
        let uniforms = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("trigon-uniforms"),
            size: uniform_size as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout =
            self.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("trigon-uniform-layout"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    }],
                });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("trigon-uniform-bind-group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            }],
        });
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("trigon-pipeline-layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        let solid = self.create_pipeline(
            program,
            &pipeline_layout,
            &vertex,
            &fragment,
            wgpu::PolygonMode::Fill,
        );
        let wireframe = self.wireframe_supported.then(|| {
            self.create_pipeline(
                program,
                &pipeline_layout,
                &vertex,
                &fragment,
                wgpu::PolygonMode::Line,
            )
        });

        WgpuProgram {
            solid,
            wireframe,
            uniforms,
            bind_group,
        }
    }

    fn create_buffer(&mut self, desc: &BufferDesc<'_>) -> wgpu::Buffer {
        let usage = match desc.kind {
            BufferKind::Vertex => wgpu::BufferUsages::VERTEX,
            BufferKind::Index => wgpu::BufferUsages::INDEX,
        };
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(desc.label),
                contents: desc.contents,
                usage,
            })
    }

    fn create_layout(&mut self, desc: &LayoutDesc<'_, wgpu::Buffer>) -> WgpuLayout {
        for attribute in desc.attributes {
            let packed = attribute.stride == 0 || attribute.stride as u64 == VEC3_STRIDE;
            if attribute.components != 3 || attribute.normalized || !packed {
                tracing::warn!(
                    target: "gpu",
                    layout = desc.label,
                    slot = attribute.slot,
                    "pipelines expect tightly packed, unnormalized Float32x3 streams"
                );
            }
        }
        WgpuLayout {
            vertex_buffers: desc
                .attributes
                .iter()
                .map(|attribute| (attribute.slot, attribute.buffer.clone()))
                .collect(),
            index_buffer: desc.index_buffer.clone(),
        }
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(self.config.width, self.config.height)
    }

    fn begin_pass(&mut self, state: &RasterState, clear: &ClearValues) {
        self.frame = Some(PendingFrame {
            raster: *state,
            clear: *clear,
            program: None,
            draws: Vec::new(),
        });
    }

    fn use_program(&mut self, program: &WgpuProgram) {
        match self.frame.as_mut() {
            Some(frame) => frame.program = Some(program.clone()),
            None => tracing::warn!(target: "gpu", "program bound outside a pass"),
        }
    }

    fn write_uniform(&mut self, program: &WgpuProgram, location: UniformLocation, value: &Mat4) {
        self.queue.write_buffer(
            &program.uniforms,
            location.offset as wgpu::BufferAddress,
            bytemuck::bytes_of(&value.to_cols_array()),
        );
    }

    fn draw_indexed(&mut self, layout: &WgpuLayout, index_count: u32, format: IndexFormat) {
        if index_count == 0 {
            return;
        }
        let Some(frame) = self.frame.as_mut() else {
            tracing::warn!(target: "gpu", "draw issued outside a pass");
            return;
        };
        let Some(program) = frame.program.clone() else {
            tracing::warn!(target: "gpu", "draw issued without an active program");
            return;
        };
        frame.draws.push(DrawCommand {
            program,
            layout: layout.clone(),
            index_count,
            format: match format {
                IndexFormat::U16 => wgpu::IndexFormat::Uint16,
                IndexFormat::U32 => wgpu::IndexFormat::Uint32,
            },
        });
    }

    fn check_error(&mut self) -> Option<String> {
        // Recorded draws only reach the GPU on submit.
        self.submit_scene();
        self.pop_errors()
    }

    fn release_program(&mut self, program: WgpuProgram) {
        program.uniforms.destroy();
    }

    fn release_buffer(&mut self, buffer: wgpu::Buffer) {
        buffer.destroy();
    }

    fn release_layout(&mut self, layout: WgpuLayout) {
        drop(layout);
    }
}

fn create_depth_view(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some("trigon-depth-texture"),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
        .create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_offscreen_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some("trigon-offscreen-target"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: config.format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    })
}

/// Prefers an sRGB format, then whatever the surface lists first.
fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> Result<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|format| format.is_srgb())
        .or_else(|| formats.first().copied())
        .context("surface reports no supported texture formats")
}

fn surface_config(
    format: wgpu::TextureFormat,
    alpha_mode: wgpu::CompositeAlphaMode,
    width: u32,
    height: u32,
) -> wgpu::SurfaceConfiguration {
    wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: width.max(1),
        height: height.max(1),
        present_mode: wgpu::PresentMode::Fifo,
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    }
}

fn create_instance() -> wgpu::Instance {
    wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    })
}

async fn request_adapter(
    instance: &wgpu::Instance,
    surface: Option<&wgpu::Surface<'static>>,
) -> Result<wgpu::Adapter> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: surface,
            force_fallback_adapter: false,
        })
        .await
        .context("no suitable GPU adapter found")?;
    let info = adapter.get_info();
    tracing::debug!(target: "gpu", adapter = %info.name, backend = ?info.backend, "adapter selected");
    Ok(adapter)
}

/// Requests line rasterization when the adapter has it.
async fn request_device(adapter: &wgpu::Adapter) -> Result<(wgpu::Device, wgpu::Queue, bool)> {
    let wireframe_supported = adapter
        .features()
        .contains(wgpu::Features::POLYGON_MODE_LINE);
    let required_features = if wireframe_supported {
        wgpu::Features::POLYGON_MODE_LINE
    } else {
        wgpu::Features::empty()
    };

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("trigon-device"),
            required_features,
            required_limits: wgpu::Limits::default(),
            memory_hints: wgpu::MemoryHints::default(),
            ..Default::default()
        })
        .await
        .context("failed to create GPU device")?;
    Ok((device, queue, wireframe_supported))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_format_prefers_srgb() {
        let formats = [
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Bgra8UnormSrgb,
        ];
        assert_eq!(
            pick_surface_format(&formats).unwrap(),
            wgpu::TextureFormat::Bgra8UnormSrgb
        );
        assert_eq!(
            pick_surface_format(&formats[..1]).unwrap(),
            wgpu::TextureFormat::Bgra8Unorm
        );
    }

    #[test]
    fn surface_without_formats_is_an_error() {
        let err = pick_surface_format(&[]).unwrap_err();
        assert!(
            err.to_string().contains("no supported texture formats"),
            "unexpected error: {err}"
        );
    }
}
