//! Read-only statistics overlay drawn with egui on top of the particles

use glam::Vec2;

use crate::simulation::StepStats;

pub struct EguiIntegration {
    pub ctx: egui::Context,
    raw_input: egui::RawInput,

    renderer: egui_wgpu::Renderer,
    clipped_shapes: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
}

impl EguiIntegration {
    pub fn new(device: &wgpu::Device, swapchain_format: wgpu::TextureFormat) -> Self {
        let renderer = egui_wgpu::Renderer::new(device, swapchain_format, None, 1);

        Self {
            ctx: egui::Context::default(),
            raw_input: egui::RawInput::default(),

            renderer,
            clipped_shapes: Vec::new(),
            textures_delta: egui::TexturesDelta::default(),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.raw_input.screen_rect = Some(egui::Rect::from_min_size(
            Default::default(),
            egui::Vec2::new(width as f32, height as f32),
        ));
    }

    pub fn run<F: FnOnce(&egui::Context)>(&mut self, run_ui: F) {
        let raw_input = std::mem::take(&mut self.raw_input);
        self.ctx.begin_frame(raw_input);
        run_ui(&self.ctx);

        let output = self.ctx.end_frame();
        self.clipped_shapes = self.ctx.tessellate(output.shapes, output.pixels_per_point);
        self.textures_delta = output.textures_delta;
    }

    pub fn pre_render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
    ) {
        let screen_descriptor = self.screen_descriptor();

        self.renderer.update_buffers(
            device,
            queue,
            encoder,
            &self.clipped_shapes,
            &screen_descriptor,
        );

        for (id, delta) in &self.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }

        for id in &self.textures_delta.free {
            self.renderer.free_texture(id);
        }
        self.textures_delta.clear();
    }

    pub fn render<'a>(&'a mut self, rpass: &mut wgpu::RenderPass<'a>) {
        let screen_descriptor = self.screen_descriptor();

        self.renderer
            .render(rpass, &self.clipped_shapes, &screen_descriptor);
    }

    fn screen_descriptor(&self) -> egui_wgpu::ScreenDescriptor {
        let screen_rect = self.ctx.screen_rect();
        egui_wgpu::ScreenDescriptor {
            size_in_pixels: [screen_rect.width() as u32, screen_rect.height() as u32],
            pixels_per_point: self.ctx.pixels_per_point(),
        }
    }

    pub fn mouse_event(
        &mut self,
        position: Vec2,
        state: winit::event::ElementState,
        button: winit::event::MouseButton,
    ) {
        let pressed = matches!(state, winit::event::ElementState::Pressed);
        let button = match button {
            winit::event::MouseButton::Left => egui::PointerButton::Primary,
            winit::event::MouseButton::Right => egui::PointerButton::Secondary,
            winit::event::MouseButton::Middle => egui::PointerButton::Middle,
            _ => return,
        };

        self.raw_input.events.push(egui::Event::PointerButton {
            pos: egui::Pos2::new(position.x, position.y),
            button,
            pressed,
            modifiers: egui::Modifiers::default(),
        });
    }

    pub fn mouse_motion(&mut self, position: Vec2) {
        self.raw_input
            .events
            .push(egui::Event::PointerMoved(egui::Pos2::new(
                position.x, position.y,
            )));
    }
}

/// Numbers shown in the overlay for the frame that was just drawn
#[derive(Clone, Copy, Debug, Default)]
pub struct HudInfo {
    pub fps: f32,
    pub particles: usize,
    pub seed: u64,
    pub last_step: StepStats,
}

impl HudInfo {
    pub fn lines(&self) -> [String; 5] {
        [
            format!("FPS {:.1}", self.fps),
            format!("Frame {}", self.last_step.frame),
            format!("Particles {}", self.particles),
            format!(
                "Collisions {}  Bounces {}",
                self.last_step.collisions, self.last_step.wall_bounces
            ),
            format!("Seed {}", self.seed),
        ]
    }
}

pub fn stats_window(ctx: &egui::Context, info: &HudInfo) {
    egui::Window::new("Simulation")
        .default_width(145.0)
        .resizable(false)
        .show(ctx, |ui| {
            for line in info.lines() {
                ui.label(line);
            }
            ui.separator();
            ui.small("[H] hide");
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hud_lines_show_step_counters() {
        let info = HudInfo {
            fps: 59.94,
            particles: 400,
            seed: 12,
            last_step: StepStats {
                frame: 300,
                collisions: 17,
                wall_bounces: 4,
            },
        };

        let lines = info.lines();
        assert_eq!(lines[0], "FPS 59.9");
        assert_eq!(lines[1], "Frame 300");
        assert_eq!(lines[2], "Particles 400");
        assert_eq!(lines[3], "Collisions 17  Bounces 4");
        assert_eq!(lines[4], "Seed 12");
    }
}
