use std::f64::consts::FRAC_PI_2;

use glam::DVec2;
use log::info;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::config::{BroadPhase, SimulationConfig};
use crate::error::Result;
use crate::particle::Particle;
use crate::surface::{FrameClock, RenderSurface};

/// What happened during a single [`Simulation::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Frame number, starting at 1 for the first step
    pub frame: u64,
    pub collisions: u32,
    pub wall_bounces: u32,
}

pub struct Simulation {
    config: SimulationConfig,
    seed: u64,
    particles: Vec<Particle>,
    frame: u64,
}

impl Simulation {
    /// Spawn `config.particle_count` particles from `config.seed`, or from a
    /// fresh random seed when none is set.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let mut rng = Pcg64::seed_from_u64(seed);
        let mut sim = Self::with_rng(config, &mut rng)?;
        sim.seed = seed;

        info!(
            "Spawned {} particles in a {}x{} arena (seed {})",
            sim.particles.len(),
            sim.config.arena_width,
            sim.config.arena_height,
            seed
        );

        Ok(sim)
    }

    pub fn with_rng<R: Rng>(config: SimulationConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;

        let mut sim = Self {
            seed: config.seed.unwrap_or_default(),
            particles: Vec::with_capacity(config.particle_count),
            frame: 0,
            config,
        };
        sim.add_particles(rng)?;

        Ok(sim)
    }

    fn add_particles<R: Rng>(&mut self, rng: &mut R) -> Result<()> {
        let x_range = self.config.spawn_range(self.config.arena_width)?;
        let y_range = self.config.spawn_range(self.config.arena_height)?;

        for _ in 0..self.config.particle_count {
            let position = DVec2::new(
                rng.gen_range(x_range.clone()) as f64,
                rng.gen_range(y_range.clone()) as f64,
            );
            let speed = rng.gen_range(1..=10) as f64;
            let angle = rng.gen_range(0.0..FRAC_PI_2);

            self.particles.push(Particle::new(
                position,
                self.config.radius,
                speed,
                angle,
                self.config.foreground,
            ));
        }

        Ok(())
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of steps taken so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Advance every particle by one frame without drawing.
    ///
    /// Particles are processed in collection order. Particle `i` is first
    /// tested against every later particle, then bounced off the walls and
    /// moved. Later particles therefore see the already-updated state of
    /// earlier ones within the same step.
    pub fn step(&mut self) -> StepStats {
        if self.config.broad_phase == BroadPhase::Sweep {
            self.particles.sort_by(|a, b| a.position.x.total_cmp(&b.position.x));
        }

        let arena = self.config.arena();
        let mut stats = StepStats::default();

        for i in 0..self.particles.len() {
            let (head, tail) = self.particles.split_at_mut(i + 1);
            let particle = &mut head[i];

            for other in tail.iter_mut() {
                let reach = particle.position.x + particle.radius;
                let start = other.position.x - other.radius;
                if reach > start {
                    if particle.collide(other) {
                        stats.collisions += 1;
                    }
                } else if self.config.broad_phase == BroadPhase::Sweep {
                    break;
                }
            }

            stats.wall_bounces += particle.bounce(&arena);
            particle.move_forward();
        }

        self.frame += 1;
        stats.frame = self.frame;
        stats
    }

    /// One simulation step followed by a full render.
    pub fn update<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) -> Result<StepStats> {
        let stats = self.step();
        self.render(surface)?;
        Ok(stats)
    }

    pub fn render<S: RenderSurface + ?Sized>(&self, surface: &mut S) -> Result<()> {
        surface.fill(self.config.background);
        for particle in &self.particles {
            particle.draw(surface);
        }
        surface.present()
    }

    /// A single iteration of the real-time loop: wait for the frame boundary,
    /// then update (which renders).
    pub fn run_frame<C, S>(&mut self, clock: &mut C, surface: &mut S) -> Result<StepStats>
    where
        C: FrameClock + ?Sized,
        S: RenderSurface + ?Sized,
    {
        clock.tick(self.config.target_fps);
        self.update(surface)
    }
}
