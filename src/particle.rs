use std::f64::consts::{FRAC_PI_2, PI};

use glam::DVec2;

use crate::config::Arena;
use crate::surface::{Color, RenderSurface};

/// A disc moving at constant speed along `angle`.
///
/// Heading convention: `angle = 0` moves towards -x, and a positive
/// angle moves towards +y (down the screen).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: DVec2,
    pub radius: f64,
    pub speed: f64,
    /// Radians, never normalized
    pub angle: f64,
    pub color: Color,
}

impl Particle {
    pub fn new(position: DVec2, radius: f64, speed: f64, angle: f64, color: Color) -> Self {
        Self {
            position,
            radius,
            speed,
            angle,
            color,
        }
    }

    pub fn move_forward(&mut self) {
        self.position.x -= self.angle.cos() * self.speed;
        self.position.y += self.angle.sin() * self.speed;
    }

    /// Mirror the particle back inside the arena and adjust its heading.
    ///
    /// The x and y axes are handled independently, so a corner hit flips both.
    /// Returns the number of walls hit.
    pub fn bounce(&mut self, arena: &Arena) -> u32 {
        let mut hits = 0;

        if self.position.x > arena.width - self.radius {
            self.position.x = 2.0 * (arena.width - self.radius) - self.position.x;
            self.angle = PI - self.angle;
            hits += 1;
        } else if self.position.x < self.radius {
            self.position.x = 2.0 * self.radius - self.position.x;
            self.angle = PI - self.angle;
            hits += 1;
        }

        if self.position.y > arena.height - self.radius {
            self.position.y = 2.0 * (arena.lower_reflect_extent() - self.radius) - self.position.y;
            self.angle *= -1.0;
            hits += 1;
        } else if self.position.y < self.radius {
            self.position.y = 2.0 * self.radius - self.position.y;
            self.angle *= -1.0;
            hits += 1;
        }

        hits
    }

    /// Resolve an overlap with `other`.
    ///
    /// Both headings are mirrored about the line through the two centers,
    /// speeds are untouched. The pair is then pushed one unit apart along the
    /// perpendicular of that line, regardless of how deep the overlap is.
    /// Returns `false` and changes nothing when the discs don't overlap.
    pub fn collide(&mut self, other: &mut Particle) -> bool {
        let delta = self.position - other.position;
        let distance = delta.x.hypot(delta.y);
        let overlapping = distance < self.radius + other.radius;
        if !overlapping {
            return false;
        }

        let tangent = delta.y.atan2(delta.x);
        let push = FRAC_PI_2 + tangent;

        self.angle = 2.0 * tangent - self.angle;
        other.angle = 2.0 * tangent - other.angle;

        let (sin, cos) = push.sin_cos();
        self.position.x -= cos;
        self.position.y += sin;
        other.position.x += cos;
        other.position.y -= sin;

        true
    }

    pub fn draw<S: RenderSurface + ?Sized>(&self, surface: &mut S) {
        surface.draw_filled_circle(self.color, self.position.as_vec2(), self.radius as f32);
    }
}
