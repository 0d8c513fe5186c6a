//! Keeps a spawned effect glued to the missile
//!
//! Runs alongside the missile's own update and ends as soon as either the
//! missile or the followed effect is gone.

use glam::Vec2;

use super::particles::{ParticleHandle, ParticleSpawner};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowTask {
    pub handle: ParticleHandle,
    /// Particle position relative to the parent when following started
    pub offset: Vec2,
}

impl FollowTask {
    pub fn start(handle: ParticleHandle, particle_pos: Vec2, parent_pos: Vec2) -> Self {
        Self {
            handle,
            offset: particle_pos - parent_pos,
        }
    }

    /// Copy the parent position onto the particle.
    /// Returns `false` once the task has terminated.
    pub fn tick(
        &self,
        parent_alive: bool,
        parent_pos: Vec2,
        spawner: &mut dyn ParticleSpawner,
    ) -> bool {
        if !parent_alive || !spawner.is_alive(self.handle) {
            return false;
        }
        spawner.set_position(self.handle, parent_pos + self.offset)
    }
}
