use std::time::{Duration, Instant};

use crate::surface::FrameClock;

pub struct Framepacer {
    last: Instant,
    frametime: f32,
}

impl Framepacer {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            frametime: 0.0,
        }
    }

    pub fn framerate(&self) -> f32 {
        if self.frametime > f32::EPSILON {
            1.0 / self.frametime
        } else {
            0.0
        }
    }

    fn elapsed(&self) -> f32 {
        self.last.elapsed().as_secs_f32()
    }
}

impl Default for Framepacer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for Framepacer {
    fn tick(&mut self, target_fps: u32) -> f32 {
        let limit_frametime = if target_fps == 0 {
            0.0
        } else {
            1.0 / target_fps as f32
        };

        if limit_frametime > f32::EPSILON && limit_frametime.is_finite() {
            const ACCURACY: f32 = 0.0001; // 100 microseconds
            let sleep_time = limit_frametime - self.elapsed() - ACCURACY;

            if sleep_time > 0.0 {
                std::thread::sleep(Duration::from_secs_f32(sleep_time));
            }

            while self.elapsed() < limit_frametime {
                std::thread::yield_now();
            }
        }

        let now = Instant::now();
        self.frametime = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        self.frametime
    }
}
