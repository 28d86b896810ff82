mod input;

use anyhow::{Context, Result};
use clap::Parser;
use input::WinitInput;
use pyramid_common::ViewerConfig;
use pyramid_frame::{FrameLoop, LoopState, Scene};
use pyramid_input::InputSource;
use pyramid_render::{TextureData, pyramid};
use pyramid_render_wgpu::WgpuBackend;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "pyramid-desktop", about = "Fly around a spinning textured pyramid")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Window width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Image applied to the pyramid
    #[arg(long)]
    texture: Option<String>,
}

impl Cli {
    fn load_config(&self) -> Result<ViewerConfig> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ViewerConfig::default(),
        };
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
        if let Some(texture) = &self.texture {
            config.scene.texture = texture.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

/// GPU-side state, created once the window exists.
struct Gpu {
    window: Arc<Window>,
    backend: WgpuBackend,
    frame_loop: FrameLoop,
}

struct ViewerApp {
    config: ViewerConfig,
    input: WinitInput,
    gpu: Option<Gpu>,
    cursor_captured: bool,
    error: Option<anyhow::Error>,
}

impl ViewerApp {
    fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            input: WinitInput::new(),
            gpu: None,
            cursor_captured: false,
            error: None,
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<Gpu> {
        let attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = Arc::new(event_loop.create_window(attrs)?);
        let size = window.inner_size();

        let mut backend = WgpuBackend::new(
            window.clone(),
            size.width,
            size.height,
            self.config.scene.clear_color,
        )?;

        let scene_cfg = &self.config.scene;
        let texture = TextureData::load_or_fallback(&scene_cfg.texture, scene_cfg.flip_texture);
        let scene = Scene::upload(&mut backend, &pyramid(), &texture, scene_cfg.brightness)?;

        let start = self.input.elapsed_time_seconds();
        let mut frame_loop = FrameLoop::new(&self.config, scene, start);
        frame_loop.resize(size.width, size.height);

        self.input.attach(window.clone());

        Ok(Gpu {
            window,
            backend,
            frame_loop,
        })
    }

    fn set_cursor_captured(&mut self, captured: bool) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        if captured {
            let grabbed = gpu
                .window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| gpu.window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(e) = grabbed {
                tracing::warn!("could not grab cursor: {e}");
            }
            gpu.frame_loop.reactivate_cursor();
        } else {
            if let Err(e) = gpu.window.set_cursor_grab(CursorGrabMode::None) {
                tracing::warn!("could not release cursor: {e}");
            }
            self.input.release_all();
        }
        gpu.window.set_cursor_visible(!captured);
        self.cursor_captured = captured;
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        match self.init_gpu(event_loop) {
            Ok(gpu) => {
                self.gpu = Some(gpu);
                self.set_cursor_captured(true);
            }
            Err(e) => {
                tracing::error!("failed to initialise renderer: {e:#}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                // Seen by the loop at the next iteration boundary.
                self.input.request_termination();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.backend.resize(new_size.width, new_size.height);
                    gpu.frame_loop.resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::Focused(focused) => {
                self.set_cursor_captured(focused);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                self.input
                    .handle_key(key, key_state == ElementState::Pressed);
            }
            WindowEvent::RedrawRequested => {
                if self.input.should_terminate() {
                    event_loop.exit();
                    return;
                }
                let Some(gpu) = &mut self.gpu else {
                    return;
                };

                if gpu.frame_loop.step(&mut self.input, &mut gpu.backend) == LoopState::Terminated
                {
                    tracing::info!(frames = gpu.frame_loop.frames(), "viewer closing");
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.cursor_captured {
                self.input.add_mouse_motion(delta.0, delta.1);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = cli.load_config()?;
    tracing::info!(
        width = config.window.width,
        height = config.window.height,
        texture = %config.scene.texture,
        "pyramid-desktop starting"
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
