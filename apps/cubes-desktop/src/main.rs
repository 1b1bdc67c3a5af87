use anyhow::Result;
use clap::Parser;
use cubes_common::{SimConfig, SubmissionMode, ViewConfig};
use cubes_input::{Button, HeldButtons};
use cubes_render::{FrameController, FrameLoop};
use cubes_render_wgpu::{SurfacePresenter, WgpuBackend, init_surface};
use cubes_tools::TracingDiagnostics;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "cubes-desktop", about = "Bouncing cubes in a desktop window")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// RNG seed for the initial population
    #[arg(long)]
    seed: Option<u64>,

    /// Population capacity
    #[arg(long)]
    cubes: Option<usize>,

    /// Start in array submission mode
    #[arg(long)]
    draw_arrays: bool,

    /// Start with blending disabled
    #[arg(long)]
    no_blend: bool,
}

impl Cli {
    fn sim_config(&self) -> SimConfig {
        let mut config = SimConfig::default();
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(cubes) = self.cubes {
            config.capacity = cubes;
        }
        if self.draw_arrays {
            config.flags.submission = SubmissionMode::Arrays;
        }
        if self.no_blend {
            config.flags.blending = false;
        }
        config
    }
}

/// Keyboard stand-ins for the controller buttons.
fn button_for_key(key: KeyCode) -> Option<Button> {
    match key {
        KeyCode::Escape | KeyCode::Enter => Some(Button::Start),
        KeyCode::KeyA => Some(Button::A),
        KeyCode::KeyB => Some(Button::B),
        _ => None,
    }
}

type DesktopLoop = FrameLoop<WgpuBackend, SurfacePresenter, HeldButtons, TracingDiagnostics>;

struct CubesApp {
    config: SimConfig,
    view: ViewConfig,
    window: Option<Arc<Window>>,
    frame_loop: Option<DesktopLoop>,
    error: Option<anyhow::Error>,
}

impl CubesApp {
    fn new(config: SimConfig) -> Self {
        Self {
            config,
            view: ViewConfig::default(),
            window: None,
            frame_loop: None,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Cubes")
            .with_inner_size(PhysicalSize::new(self.view.width, self.view.height))
            .with_resizable(false);
        let window = Arc::new(event_loop.create_window(attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;

        let size = window.inner_size();
        let (backend, presenter) = init_surface(&instance, surface, size.width, size.height)?;

        let controller = FrameController::new(self.config.clone(), self.view);
        self.frame_loop = Some(FrameLoop::new(
            controller,
            backend,
            presenter,
            HeldButtons::new(),
            TracingDiagnostics::new(),
        ));
        self.window = Some(window);
        Ok(())
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(frame_loop) = &mut self.frame_loop {
            frame_loop.finish();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for CubesApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            tracing::error!("failed to start: {e:#}");
            self.error = Some(e);
            event_loop.exit();
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
                self.shutdown(event_loop);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        ..
                    },
                ..
            } => {
                if let (Some(button), Some(frame_loop)) = (button_for_key(key), &mut self.frame_loop) {
                    frame_loop
                        .input_mut()
                        .set(button, state == ElementState::Pressed);
                }
            }
            WindowEvent::RedrawRequested => {
                let Some(frame_loop) = &mut self.frame_loop else {
                    return;
                };
                if !frame_loop.run_once() {
                    self.shutdown(event_loop);
                    return;
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = cli.sim_config();
    config.validate()?;

    tracing::info!("cubes-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = CubesApp::new(config);
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
