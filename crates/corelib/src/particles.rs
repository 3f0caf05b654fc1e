//! CPU particle simulation: explicit Euler under gravity, respawn on death,
//! back-to-front sorting for alpha blending.
//!
//! The simulation owns a parallel array of [`ParticleGpu`] records that is
//! refreshed after every step and sort, so it can be streamed into a vertex
//! buffer (drawn as points and expanded to sprites on the GPU).

use bytemuck::{Pod, Zeroable};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{Vec3, vec3};

pub const GRAVITY: Vec3 = Vec3::new(0.0, -9.8, 0.0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub color: Vec3,
    pub size: f32,
    /// Remaining lifetime in seconds.
    pub life: f32,
}

impl Particle {
    pub fn to_gpu(&self) -> ParticleGpu {
        ParticleGpu {
            position: self.position.to_array(),
            size: self.size,
            color: self.color.to_array(),
        }
    }
}

/// Vertex layout: location 0 = position, 1 = size, 2 = color.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleGpu {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 3],
}

/// Emitter parameters for newly spawned particles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSettings {
    pub size: f32,
    pub velocity_min: f32,
    pub velocity_max: f32,
    pub life_min: f32,
    pub life_max: f32,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            size: 0.05,
            velocity_min: 2.0,
            velocity_max: 4.0,
            life_min: 1.0,
            life_max: 3.0,
        }
    }
}

impl ParticleSettings {
    /// Clamp to finite, non-negative values with `min <= max`. NaN and
    /// infinite minimums become 0; a non-finite maximum collapses to its
    /// minimum.
    pub fn sanitize(&mut self) {
        self.size = finite_or(self.size, 0.0).max(0.0);
        self.velocity_min = finite_or(self.velocity_min, 0.0).max(0.0);
        self.velocity_max = finite_or(self.velocity_max, self.velocity_min).max(self.velocity_min);
        self.life_min = finite_or(self.life_min, 0.0).max(0.0);
        self.life_max = finite_or(self.life_max, self.life_min).max(self.life_min);
    }

    pub fn sanitized(mut self) -> Self {
        self.sanitize();
        self
    }

    /// New particle at the origin, shot upwards in a random direction.
    pub fn spawn<R: Rng>(&self, rng: &mut R) -> Particle {
        let s = self.sanitized();
        let direction = vec3(
            rng.gen_range(-0.5..=0.5),
            1.0,
            rng.gen_range(-0.5..=0.5),
        )
        .normalize();
        Particle {
            position: Vec3::ZERO,
            velocity: rng.gen_range(s.velocity_min..=s.velocity_max) * direction,
            color: vec3(rng.r#gen(), rng.r#gen(), rng.r#gen()),
            size: s.size,
            life: rng.gen_range(s.life_min..=s.life_max),
        }
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

pub struct ParticleSystem {
    particles: Vec<Particle>,
    gpu: Vec<ParticleGpu>,
    settings: ParticleSettings,
    rng: StdRng,
}

impl ParticleSystem {
    /// Seeded so runs are reproducible.
    pub fn new(count: usize, settings: ParticleSettings, seed: u64) -> Self {
        let mut system = Self {
            particles: Vec::new(),
            gpu: Vec::new(),
            settings: settings.sanitized(),
            rng: StdRng::seed_from_u64(seed),
        };
        system.resize(count);
        system
    }

    /// Respawn the whole population with `count` particles.
    pub fn resize(&mut self, count: usize) {
        log::info!("Initialize the particles ... {}", count);
        let settings = self.settings;
        let rng = &mut self.rng;
        self.particles = (0..count).map(|_| settings.spawn(&mut *rng)).collect();
        self.sync_gpu();
    }

    #[inline]
    pub fn settings(&self) -> &ParticleSettings {
        &self.settings
    }

    /// Applies to particles spawned from now on.
    pub fn set_settings(&mut self, settings: ParticleSettings) {
        self.settings = settings.sanitized();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Direct access for tools and tests; call [`Self::sync_gpu`] afterwards.
    #[inline]
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Advance by `delta_time * speed` seconds.
    pub fn step(&mut self, delta_time: f32, speed: f32) {
        let dt = delta_time * speed;
        for p in &mut self.particles {
            p.life -= dt;
            if p.life <= 0.0 {
                *p = self.settings.spawn(&mut self.rng);
            } else {
                p.position += dt * p.velocity;
                p.velocity += dt * GRAVITY;
            }
        }
        self.sync_gpu();
    }

    /// Order particles from farthest to nearest to `eye`.
    pub fn sort_back_to_front(&mut self, eye: Vec3) {
        self.particles.sort_by(|a, b| {
            b.position
                .distance_squared(eye)
                .total_cmp(&a.position.distance_squared(eye))
        });
        self.sync_gpu();
    }

    pub fn sync_gpu(&mut self) {
        self.gpu.clear();
        self.gpu.extend(self.particles.iter().map(Particle::to_gpu));
    }

    #[inline]
    pub fn gpu_data(&self) -> &[ParticleGpu] {
        &self.gpu
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.gpu)
    }
}
