// Simple particle struct to keep track of individual position, velocity,
// color, and how much life it has left

use crate::color::Color;
use crate::config::EngineConfig;
use rand::seq::SliceRandom;
use rand::Rng;
use vecmath::Vector2;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vector2<f64>,
    pub vel: Vector2<f64>,
    pub size: f64,
    pub color: Color,
    pub opacity: f64,
    pub life: f64,
    pub decay: f64,
}

impl Particle {
    pub fn new(
        pos: Vector2<f64>,
        vel: Vector2<f64>,
        size: f64,
        color: Color,
        opacity: f64,
        decay: f64,
    ) -> Particle {
        Particle {
            pos,
            vel,
            size,
            color,
            opacity,
            life: 1.0,
            decay,
        }
    }

    // Spawns around the pointer, carrying a bit of its velocity
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        config: &EngineConfig,
        pointer: Vector2<f64>,
        pointer_vel: Vector2<f64>,
    ) -> Particle {
        let offset = config.spawn_offset;
        let jitter = config.velocity_jitter;
        let pos = [
            pointer[0] + sample(rng, -offset, offset),
            pointer[1] + sample(rng, -offset, offset),
        ];
        let vel = [
            pointer_vel[0] * config.velocity_inherit + sample(rng, -jitter, jitter),
            pointer_vel[1] * config.velocity_inherit + sample(rng, -jitter, jitter),
        ];
        let color = config
            .palette
            .choose(rng)
            .copied()
            .unwrap_or(Color::TRANSPARENT);

        Particle::new(
            pos,
            vel,
            sample(rng, config.size_range.0, config.size_range.1),
            color,
            sample(rng, config.opacity_range.0, config.opacity_range.1),
            sample(rng, config.decay_range.0, config.decay_range.1),
        )
    }

    pub fn step(&mut self, gravity: f64, drag: f64) {
        self.pos = vecmath::vec2_add(self.pos, self.vel);
        self.vel[1] += gravity;
        self.vel = vecmath::vec2_scale(self.vel, drag);
        self.life -= self.decay;
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    // Fades with remaining life
    pub fn alpha(&self) -> f64 {
        self.opacity * self.life
    }

    pub fn glow_radius(&self) -> f64 {
        self.size * 2.0
    }
}

fn sample<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    if high > low {
        rng.gen_range(low, high)
    } else {
        low
    }
}
