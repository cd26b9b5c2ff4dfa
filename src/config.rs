// Tunables for the particle engine. Defaults reproduce the landing page trail.

use crate::color::{Color, PALETTE};

#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Pointer speed (px per sample) needed for each spawned particle.
    pub speed_per_particle: f64,
    /// Most particles a single pointer sample may spawn.
    pub max_spawn_per_event: usize,
    /// Hard bound on the live collection. `None` leaves growth to decay alone.
    pub max_particles: Option<usize>,
    /// Spawn position jitter around the pointer, per axis.
    pub spawn_offset: f64,
    /// Share of pointer velocity inherited by a new particle.
    pub velocity_inherit: f64,
    /// Random velocity jitter, per axis.
    pub velocity_jitter: f64,
    pub gravity: f64,
    pub drag: f64,
    pub size_range: (f64, f64),
    pub opacity_range: (f64, f64),
    pub decay_range: (f64, f64),
    pub palette: Vec<Color>,
    pub start_active: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            speed_per_particle: 2.0,
            max_spawn_per_event: 8,
            max_particles: None,
            spawn_offset: 10.0,
            velocity_inherit: 0.1,
            velocity_jitter: 1.0,
            gravity: 0.05,
            drag: 0.98,
            size_range: (1.0, 4.0),
            opacity_range: (0.2, 1.0),
            decay_range: (0.01, 0.03),
            palette: PALETTE.to_vec(),
            start_active: true,
        }
    }
}

impl EngineConfig {
    pub fn with_max_particles(mut self, max: usize) -> Self {
        self.max_particles = Some(max);
        self
    }

    pub fn with_start_active(mut self, start_active: bool) -> Self {
        self.start_active = start_active;
        self
    }

    /// Number of particles a pointer sample moving at `speed` spawns.
    pub fn spawn_count(&self, speed: f64) -> usize {
        if speed.is_nan() || speed <= 0.0 {
            return 0;
        }
        let count = (speed / self.speed_per_particle).floor();
        if count >= self.max_spawn_per_event as f64 {
            self.max_spawn_per_event
        } else {
            count as usize
        }
    }
}
