//! Collaborators the simulation draws through and is paced by
//!
//! The simulation never touches a window or GPU directly; it only sees
//! these traits, so tests can run it headless.

use glam::Vec2;

use crate::error::Result;

#[derive(bytemuck::Zeroable, Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

unsafe impl bytemuck::Pod for Color {}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

impl From<Color> for wgpu::Color {
    fn from(color: Color) -> Self {
        wgpu::Color {
            r: color.r as f64,
            g: color.g as f64,
            b: color.b as f64,
            a: color.a as f64,
        }
    }
}

/// A frame buffer in arena coordinates (origin top-left, y down).
pub trait RenderSurface {
    /// Clear the whole frame
    fn fill(&mut self, color: Color);

    fn draw_filled_circle(&mut self, color: Color, center: Vec2, radius: f32);

    /// Show everything drawn since the last `fill`.
    fn present(&mut self) -> Result<()>;
}

pub trait FrameClock {
    /// Block until the next frame boundary for `target_fps`.
    /// Returns the length of the frame that just ended, in seconds.
    fn tick(&mut self, target_fps: u32) -> f32;
}

#[cfg(test)]
pub mod testing {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub enum DrawCall {
        Fill(Color),
        Circle {
            color: Color,
            center: Vec2,
            radius: f32,
        },
        Present,
    }

    /// Records every call so tests can assert on frame contents.
    #[derive(Default)]
    pub struct RecordingSurface {
        pub calls: Vec<DrawCall>,
    }

    impl RecordingSurface {
        pub fn presents(&self) -> usize {
            self.calls
                .iter()
                .filter(|call| matches!(call, DrawCall::Present))
                .count()
        }

        pub fn circles(&self) -> impl Iterator<Item = (Color, Vec2, f32)> + '_ {
            self.calls.iter().filter_map(|call| match call {
                DrawCall::Circle {
                    color,
                    center,
                    radius,
                } => Some((*color, *center, *radius)),
                _ => None,
            })
        }
    }

    impl RenderSurface for RecordingSurface {
        fn fill(&mut self, color: Color) {
            self.calls.push(DrawCall::Fill(color));
        }

        fn draw_filled_circle(&mut self, color: Color, center: Vec2, radius: f32) {
            self.calls.push(DrawCall::Circle {
                color,
                center,
                radius,
            });
        }

        fn present(&mut self) -> Result<()> {
            self.calls.push(DrawCall::Present);
            Ok(())
        }
    }

    /// Never sleeps, only remembers what it was asked for.
    #[derive(Default)]
    pub struct CountingClock {
        pub ticks: Vec<u32>,
    }

    impl FrameClock for CountingClock {
        fn tick(&mut self, target_fps: u32) -> f32 {
            self.ticks.push(target_fps);
            1.0 / target_fps as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_wgpu_clear_color() {
        let clear: wgpu::Color = Color::WHITE.into();
        assert_eq!(clear, wgpu::Color::WHITE);
    }
}
