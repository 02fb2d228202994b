mod cli;
mod config;
mod error;
mod framepace;
mod gpu;
mod gui;
mod particle;
mod render;
mod simulation;
mod surface;

use std::sync::Arc;

use clap::Parser;
use framepace::Framepacer;
use glam::Vec2;
use gpu::GpuContext;
use gui::HudInfo;
use log::{debug, error, info};
use render::GpuCanvas;
use simulation::{Simulation, StepStats};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    // Collect Arguments
    let config = cli::Args::parse().into_config();
    info!("{config:?}");

    let simulation = Simulation::new(config)?;
    run(simulation)
}

/// Open the window and drive `simulation` one frame per loop iteration
/// until the window is closed.
fn run(simulation: Simulation) -> anyhow::Result<()> {
    // Setup Winit
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app_state = AppState {
        tokio_rt: tokio::runtime::Runtime::new()?,
        gfx: None,
        simulation,
        framepace: Framepacer::new(),

        last_step: StepStats::default(),
        mouse_position: Vec2::ZERO,
        failure: None,
    };

    event_loop.run_app(&mut app_state)?;

    match app_state.failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct GfxState {
    window: Arc<Window>,
    canvas: GpuCanvas,
}

struct AppState {
    tokio_rt: tokio::runtime::Runtime,
    gfx: Option<GfxState>,
    simulation: Simulation,
    framepace: Framepacer,

    last_step: StepStats,
    mouse_position: Vec2,
    failure: Option<anyhow::Error>,
}

impl AppState {
    fn create_gfx(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<GfxState> {
        let config = self.simulation.config();
        let window = Arc::new(
            event_loop.create_window(
                Window::default_attributes()
                    .with_title("Collide Simulation")
                    .with_inner_size(PhysicalSize::new(config.arena_width, config.arena_height))
                    .with_resizable(false),
            )?,
        );

        let gpu = self.tokio_rt.block_on(GpuContext::new(window.clone()))?;
        let canvas = GpuCanvas::new(
            gpu,
            config.arena_width,
            config.arena_height,
            config.particle_count,
        );

        Ok(GfxState { window, canvas })
    }

    /// Rendering failures are not recoverable, stop the loop and report.
    fn fail(&mut self, event_loop: &ActiveEventLoop, e: anyhow::Error) {
        error!("{e:#}");
        self.failure = Some(e);
        event_loop.exit();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gfx.is_some() {
            return;
        }

        match self.create_gfx(event_loop) {
            Ok(gfx) => {
                let size = gfx.window.inner_size();
                info!("Window ready ({}x{})", size.width, size.height);
                self.gfx = Some(gfx);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gfx) = self.gfx.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                info!("Quit after {} frames", self.simulation.frame());
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                gfx.canvas.resize(new_size.width, new_size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => match (event.state, event.physical_key) {
                (ElementState::Pressed, PhysicalKey::Code(KeyCode::Escape)) => {
                    info!("Quit after {} frames", self.simulation.frame());
                    event_loop.exit();
                }
                (ElementState::Pressed, PhysicalKey::Code(KeyCode::KeyH)) if !event.repeat => {
                    gfx.canvas.show_overlay = !gfx.canvas.show_overlay;
                }
                _ => (),
            },
            WindowEvent::MouseInput { state, button, .. } if gfx.canvas.show_overlay => {
                gfx.canvas
                    .overlay
                    .mouse_event(self.mouse_position, state, button);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = Vec2::new(position.x as f32, position.y as f32);
                if gfx.canvas.show_overlay {
                    gfx.canvas.overlay.mouse_motion(position);
                }
                self.mouse_position = position;
            }

            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if event_loop.exiting() {
            return;
        }
        let Some(gfx) = self.gfx.as_mut() else {
            return;
        };

        if gfx.canvas.show_overlay {
            let info = HudInfo {
                fps: self.framepace.framerate(),
                particles: self.simulation.particles().len(),
                seed: self.simulation.seed(),
                last_step: self.last_step,
            };
            gfx.canvas.overlay.run(|ctx| gui::stats_window(ctx, &info));
        }

        match self
            .simulation
            .run_frame(&mut self.framepace, &mut gfx.canvas)
        {
            Ok(stats) => {
                let target_fps = self.simulation.config().target_fps as u64;
                if stats.frame % target_fps == 0 {
                    debug!(
                        "Frame {}: {} collisions, {} wall bounces, {:.1} fps",
                        stats.frame,
                        stats.collisions,
                        stats.wall_bounces,
                        self.framepace.framerate()
                    );
                }
                self.last_step = stats;
            }
            Err(e) => self.fail(event_loop, e.into()),
        }
    }
}
