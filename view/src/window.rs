use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use egui_wgpu::Renderer as EguiRenderer;
use egui_winit::State as EguiState;
use trigon::{AppConfig, CameraInput, FlyCamera, FrameRenderer, ObjLoader};
use wgpu::SurfaceError;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::gpu::{OverlayFrame, WgpuDevice};

struct Gui {
    ctx: egui::Context,
    state: EguiState,
    renderer: EguiRenderer,
}

impl Gui {
    fn new(window: &Window, device: &WgpuDevice) -> Self {
        let ctx = egui::Context::default();
        let state = EguiState::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            Some(2048),
        );
        let renderer = EguiRenderer::new(
            device.device(),
            device.surface_format(),
            egui_wgpu::RendererOptions::default(),
        );
        Self {
            ctx,
            state,
            renderer,
        }
    }
}

/// Held movement keys plus pointer motion gathered since the last frame.
#[derive(Debug, Default)]
struct InputState {
    forward: bool,
    back: bool,
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    looking: bool,
    look: [f32; 2],
}

impl InputState {
    /// Returns false for keys that do not steer the camera.
    fn set_key(&mut self, code: KeyCode, pressed: bool) -> bool {
        match code {
            KeyCode::KeyW => self.forward = pressed,
            KeyCode::KeyS => self.back = pressed,
            KeyCode::KeyA => self.left = pressed,
            KeyCode::KeyD => self.right = pressed,
            KeyCode::KeyE => self.up = pressed,
            KeyCode::KeyQ => self.down = pressed,
            _ => return false,
        }
        true
    }

    fn take_camera_input(&mut self) -> CameraInput {
        CameraInput {
            forward: axis(self.forward, self.back),
            right: axis(self.right, self.left),
            up: axis(self.up, self.down),
            look: std::mem::take(&mut self.look),
        }
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    f32::from(u8::from(positive)) - f32::from(u8::from(negative))
}

struct App {
    config: AppConfig,
    window: Option<Arc<Window>>,
    renderer: Option<FrameRenderer<WgpuDevice>>,
    gui: Option<Gui>,
    camera: FlyCamera,
    input: InputState,
    last_frame: Instant,
    exit_error: Option<anyhow::Error>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let camera = FlyCamera::from_config(&config.camera);
        Self {
            config,
            window: None,
            renderer: None,
            gui: None,
            camera,
            input: InputState::default(),
            last_frame: Instant::now(),
            exit_error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!(target: "app", error = format!("{err:#}"), "shutting down");
        self.exit_error = Some(err);
        event_loop.exit();
    }

    fn initialise(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_config = &self.config.window;
        let attributes = Window::default_attributes()
            .with_title(window_config.title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(
                window_config.width,
                window_config.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("failed to create window")?,
        );

        let device = pollster::block_on(WgpuDevice::new(window.clone()))?;
        let mut renderer =
            FrameRenderer::new(device, self.config.projection, &self.config.overlay);
        renderer
            .setup(&self.config.assets, &ObjLoader)
            .context("renderer setup failed")?;
        let gui = Gui::new(&window, renderer.device());

        tracing::info!(
            target: "app",
            meshes = renderer.mesh_count(),
            "scene ready"
        );

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.gui = Some(gui);
        self.last_frame = Instant::now();
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(renderer), Some(gui)) = (
            self.window.as_ref(),
            self.renderer.as_mut(),
            self.gui.as_mut(),
        ) else {
            return;
        };

        let now = Instant::now();
        let delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.camera
            .update(&self.input.take_camera_input(), delta_time);

        let raw_input = gui.state.take_egui_input(window);
        let full_output = gui.ctx.run(raw_input, |ctx| renderer.define_gui(ctx));
        gui.state
            .handle_platform_output(window, full_output.platform_output);
        let primitives = gui
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let textures = full_output.textures_delta;
        renderer
            .device()
            .upload_overlay_textures(&mut gui.renderer, &textures);

        renderer.render(&self.camera, delta_time);

        let size = window.inner_size();
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [size.width, size.height],
            pixels_per_point: full_output.pixels_per_point,
        };
        let overlay = OverlayFrame {
            renderer: &mut gui.renderer,
            primitives: &primitives,
            screen: &screen,
        };
        let presented = renderer.device_mut().present(Some(overlay));
        for id in &textures.free {
            gui.renderer.free_texture(id);
        }

        match presented {
            Ok(()) => {}
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                renderer.device_mut().resize(size);
            }
            Err(SurfaceError::OutOfMemory) => {
                self.fail(event_loop, anyhow!("GPU ran out of memory while presenting"));
            }
            Err(SurfaceError::Timeout) => {
                tracing::warn!(target: "app", "surface timeout, skipping frame");
            }
            Err(err) => {
                tracing::warn!(target: "app", error = %err, "failed to acquire frame");
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.initialise(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let (Some(window), Some(gui)) = (self.window.as_ref(), self.gui.as_mut()) else {
            return;
        };
        let consumed = gui.state.on_window_event(window, &event).consumed;

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.device_mut().resize(physical_size);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                let pressed = state == ElementState::Pressed;
                if code == KeyCode::Escape && pressed {
                    event_loop.exit();
                } else if !consumed || !pressed {
                    self.input.set_key(code, pressed);
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Right,
                ..
            } => {
                self.input.looking = state == ElementState::Pressed && !consumed;
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.input.looking {
                self.input.look[0] += delta.0 as f32;
                self.input.look[1] += delta.1 as f32;
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // GPU resources go before the surface's window.
        self.gui = None;
        self.renderer = None;
        tracing::info!(target: "app", "renderer released");
    }
}

/// Opens the window and drives frames until it is closed. Setup failures
/// end the loop and are returned.
pub fn run(config: AppConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop
        .run_app(&mut app)
        .context("event loop terminated abnormally")?;

    match app.exit_error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
