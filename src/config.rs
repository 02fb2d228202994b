//! Startup parameters for a simulation run
//!
//! Everything here is fixed once the simulation is constructed.

use std::ops::RangeInclusive;

use clap::ValueEnum;

use crate::error::{Error, Result};
use crate::surface::Color;

/// Which arena extent the lower wall reflects about.
///
/// `Width` reproduces the historical formula `2 * (width - radius) - y`,
/// which is only correct for square arenas. `Height` reflects about the
/// actual lower wall. Both agree when `width == height`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum YWall {
    #[default]
    Width,
    Height,
}

/// Broad-phase filter used by the pairwise collision scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum BroadPhase {
    /// Every later particle `j` is tested with `x_i + r_i > x_j - r_j`,
    /// in collection order.
    #[default]
    Prefix,
    /// The collection is sorted by x before each step and the inner scan
    /// stops at the first particle that starts right of `x_i + r_i`.
    /// Reorders particles, so collision resolution order differs from `Prefix`.
    Sweep,
}

/// Bounds and wall rule handed to [`crate::particle::Particle::bounce`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arena {
    pub width: f64,
    pub height: f64,
    pub y_wall: YWall,
}

impl Arena {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            y_wall: YWall::default(),
        }
    }

    pub fn with_y_wall(mut self, y_wall: YWall) -> Self {
        self.y_wall = y_wall;
        self
    }

    /// Extent used when mirroring a particle off the lower wall.
    pub fn lower_reflect_extent(&self) -> f64 {
        match self.y_wall {
            YWall::Width => self.width,
            YWall::Height => self.height,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    pub arena_width: u32,
    pub arena_height: u32,
    pub particle_count: usize,
    pub radius: f64,
    pub target_fps: u32,

    pub background: Color,
    pub foreground: Color,

    /// Spawn seed, a random one is drawn (and logged) when unset
    pub seed: Option<u64>,
    pub y_wall: YWall,
    pub broad_phase: BroadPhase,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            arena_width: 800,
            arena_height: 800,
            particle_count: 400,
            radius: 5.0,
            target_fps: 60,

            background: Color::WHITE,
            foreground: Color::BLACK,

            seed: None,
            y_wall: YWall::Width,
            broad_phase: BroadPhase::Prefix,
        }
    }
}

impl SimulationConfig {
    pub fn arena(&self) -> Arena {
        Arena::new(self.arena_width as f64, self.arena_height as f64).with_y_wall(self.y_wall)
    }

    /// Inclusive integer spawn range `[radius, dimension - radius]` along one axis.
    pub fn spawn_range(&self, dimension: u32) -> Result<RangeInclusive<i64>> {
        let low = self.radius.ceil() as i64;
        let high = (dimension as f64 - self.radius).floor() as i64;
        if low > high {
            return Err(Error::InvalidConfig(format!(
                "arena dimension {dimension} leaves no integer spawn position for radius {}",
                self.radius
            )));
        }

        Ok(low..=high)
    }

    pub fn validate(&self) -> Result<()> {
        if self.particle_count == 0 {
            return Err(Error::InvalidConfig("particle_count must be > 0".into()));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(Error::InvalidConfig(
                "radius must be finite and > 0".into(),
            ));
        }
        if self.target_fps == 0 {
            return Err(Error::InvalidConfig("target_fps must be > 0".into()));
        }
        self.spawn_range(self.arena_width)?;
        self.spawn_range(self.arena_height)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_setup() {
        let config = SimulationConfig::default();
        assert_eq!((config.arena_width, config.arena_height), (800, 800));
        assert_eq!(config.particle_count, 400);
        assert_eq!(config.radius, 5.0);
        assert_eq!(config.target_fps, 60);
        assert_eq!(config.background, Color::WHITE);
        assert_eq!(config.foreground, Color::BLACK);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn spawn_range_is_inclusive_integer_interval() {
        let config = SimulationConfig::default();
        assert_eq!(config.spawn_range(800).unwrap(), 5..=795);

        let config = SimulationConfig {
            radius: 5.5,
            ..Default::default()
        };
        assert_eq!(config.spawn_range(800).unwrap(), 6..=794);
        assert!(config.spawn_range(11).is_err());
    }

    #[test]
    fn rejects_degenerate_parameters() {
        let cases = [
            SimulationConfig {
                particle_count: 0,
                ..Default::default()
            },
            SimulationConfig {
                radius: 0.0,
                ..Default::default()
            },
            SimulationConfig {
                radius: f64::NAN,
                ..Default::default()
            },
            SimulationConfig {
                target_fps: 0,
                ..Default::default()
            },
            SimulationConfig {
                arena_height: 9,
                ..Default::default()
            },
        ];

        for config in cases {
            let err = config.validate().unwrap_err();
            assert!(matches!(err, Error::InvalidConfig(_)), "{config:?}");
        }
    }

    #[test]
    fn lower_wall_extent_follows_mode() {
        let arena = Arena::new(800.0, 600.0);
        assert_eq!(arena.lower_reflect_extent(), 800.0);
        assert_eq!(
            arena.with_y_wall(YWall::Height).lower_reflect_extent(),
            600.0
        );
    }
}
