//! Particle effects spawned by the missile
//!
//! The missile only spawns and moves effects. Their lifetime is owned by the
//! spawner, the same way an engine's particle system cleans up after itself.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A preconfigured visual effect definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleTemplate {
    pub name: String,
    /// How long a spawned instance lives before the spawner removes it
    pub lifetime_secs: f32,
}

impl ParticleTemplate {
    pub fn new(name: impl Into<String>, lifetime_secs: f32) -> Self {
        Self {
            name: name.into(),
            lifetime_secs,
        }
    }
}

/// Handle to a spawned particle effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticleHandle(pub u32);

/// Spawns particle effects and exposes their position and liveness
pub trait ParticleSpawner {
    fn spawn_at(&mut self, template: &ParticleTemplate, pos: Vec2) -> ParticleHandle;

    /// Current position, `None` once the effect is gone
    fn position(&self, handle: ParticleHandle) -> Option<Vec2>;

    /// Move a live effect. Returns `false` if it no longer exists.
    fn set_position(&mut self, handle: ParticleHandle, pos: Vec2) -> bool;

    fn is_alive(&self, handle: ParticleHandle) -> bool {
        self.position(handle).is_some()
    }
}

/// Maximum live particles in a field
pub const MAX_PARTICLES: usize = 256;

/// A live particle effect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub handle: ParticleHandle,
    pub template: String,
    pub pos: Vec2,
    pub life: f32, // 0-1, decreases over time
    /// Life lost per second (1 / template lifetime)
    pub decay: f32,
}

/// In-memory particle spawner with self-managed lifetimes
#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
    next_id: u32,
    spawned: u32,
}

impl ParticleField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Age every particle and drop the expired ones
    pub fn step(&mut self, dt: f32) {
        for particle in self.particles.iter_mut() {
            particle.life -= particle.decay * dt;
        }
        self.particles.retain(|p| p.life > 0.0);
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

    /// Total particles ever spawned into this field
    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    fn find(&self, handle: ParticleHandle) -> Option<&Particle> {
        self.particles.iter().find(|p| p.handle == handle)
    }
}

impl ParticleSpawner for ParticleField {
    fn spawn_at(&mut self, template: &ParticleTemplate, pos: Vec2) -> ParticleHandle {
        self.next_id += 1;
        self.spawned += 1;
        let handle = ParticleHandle(self.next_id);

        // Evict oldest first
        if self.particles.len() >= MAX_PARTICLES {
            self.particles.remove(0);
        }

        self.particles.push(Particle {
            handle,
            template: template.name.clone(),
            pos,
            life: 1.0,
            decay: 1.0 / template.lifetime_secs.max(f32::EPSILON),
        });
        handle
    }

    fn position(&self, handle: ParticleHandle) -> Option<Vec2> {
        self.find(handle).map(|p| p.pos)
    }

    fn set_position(&mut self, handle: ParticleHandle, pos: Vec2) -> bool {
        match self.particles.iter_mut().find(|p| p.handle == handle) {
            Some(particle) => {
                particle.pos = pos;
                true
            }
            None => false,
        }
    }
}
