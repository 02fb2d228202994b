use clap::Parser;

use crate::config::{BroadPhase, SimulationConfig, YWall};

/// Bouncing, colliding discs in a closed box
#[derive(Parser, Debug)]
#[command()]
pub struct Args {
    /// Arena width in pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Arena height in pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Number of particles, fixed for the whole run
    #[arg(short, long, default_value_t = 400)]
    pub particles: usize,

    #[arg(short, long, default_value_t = 5.0)]
    pub radius: f64,

    /// The framerate the simulation will run at
    #[arg(short, long, default_value_t = 60)]
    pub framerate: u32,

    /// Seed for the initial spawn, random if omitted
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Extent the lower wall reflects about.
    ///
    /// `width` matches the historical behaviour, `height` is correct for
    /// non-square arenas
    #[arg(long, value_enum, default_value_t = YWall::Width)]
    pub y_wall: YWall,

    #[arg(long, value_enum, default_value_t = BroadPhase::Prefix)]
    pub broad_phase: BroadPhase,
}

impl Args {
    pub fn into_config(self) -> SimulationConfig {
        SimulationConfig {
            arena_width: self.width,
            arena_height: self.height,
            particle_count: self.particles,
            radius: self.radius,
            target_fps: self.framerate,
            seed: self.seed,
            y_wall: self.y_wall,
            broad_phase: self.broad_phase,
            ..Default::default()
        }
    }
}
