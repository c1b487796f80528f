/// Particle pool: bursts spawned by gameplay events, aged every frame.

use std::f32::consts::TAU;

use rand::Rng;

use crate::entities::{Particle, ParticleKind};

/// Bounded set of live particles.
#[derive(Clone, Debug)]
pub struct ParticlePool {
    particles: Vec<Particle>,
    capacity: usize,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: Vec::new(),
            capacity,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Add one particle.  Zero-life particles and spawns past capacity are dropped.
    pub fn spawn(&mut self, particle: Particle) {
        if particle.life == 0 || self.particles.len() >= self.capacity {
            return;
        }
        self.particles.push(particle);
    }

    /// `count` particles at `(x, y)` with velocities spread uniformly in
    /// `±spread_x` horizontally and `[-lift, 0]` vertically.
    #[allow(clippy::too_many_arguments)]
    pub fn burst(
        &mut self,
        rng: &mut impl Rng,
        kind: ParticleKind,
        x: f32,
        y: f32,
        count: usize,
        spread_x: f32,
        lift: f32,
        life: u32,
    ) {
        for _ in 0..count {
            self.spawn(Particle {
                x,
                y,
                vx: (rng.gen::<f32>() - 0.5) * 2.0 * spread_x,
                vy: -rng.gen::<f32>() * lift,
                life,
                max_life: life,
                kind,
            });
        }
    }

    /// `count` particles fanned evenly around a circle at `speed`.
    pub fn ring(
        &mut self,
        kind: ParticleKind,
        x: f32,
        y: f32,
        count: usize,
        speed: f32,
        life: u32,
    ) {
        for i in 0..count {
            let angle = i as f32 * TAU / count as f32;
            self.spawn(Particle {
                x,
                y,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                life,
                max_life: life,
                kind,
            });
        }
    }

    /// Integrate, pull down by `gravity`, count down, and drop the particles
    /// whose life hit zero this frame.
    pub fn age(&mut self, gravity: f32) {
        for p in self.particles.iter_mut() {
            p.x += p.vx;
            p.y += p.vy;
            p.vy += gravity;
            p.life = p.life.saturating_sub(1);
        }
        self.particles.retain(|p| p.life > 0);
    }
}
