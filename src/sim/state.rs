//! Missile state and core types
//!
//! A missile is spawned once, advanced by [`MiningMissile::update`] every
//! frame, and reacts to trigger overlaps via
//! [`MiningMissile::on_trigger_enter`] (both in `tick.rs`).

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::follow::FollowTask;
use super::host::MissileServices;
use super::particles::ParticleHandle;
use crate::audio::AudioClip;
use crate::tuning::MissileTuning;

/// Why a missile was removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestroyCause {
    /// Lifetime ran out
    Expired,
    /// Hit an obstacle
    Impact,
}

/// Current phase of a missile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissilePhase {
    /// In flight, before or after the boost
    Flying { accelerated: bool },
    /// Impact effects fired, removed on the next update
    Destroying,
    /// Gone. Nothing happens after this.
    Destroyed { cause: DestroyCause },
}

/// Lifecycle stage; the boost flag lives beside it on the missile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Stage {
    Flying,
    Destroying,
    Destroyed(DestroyCause),
}

/// Something observable the missile did this frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MissileEvent {
    Accelerated,
    SmokeSpawned { pos: Vec2 },
    ImpactSound { clip: AudioClip },
    ImpactParticles { handle: ParticleHandle, pos: Vec2 },
    Destroyed { cause: DestroyCause },
}

/// A single mining missile
pub struct MiningMissile {
    pub(super) tuning: MissileTuning,
    pub(super) services: MissileServices,
    pub(super) stage: Stage,
    /// Seconds until timed self-destruct
    pub(super) remaining_lifetime: f32,
    /// Seconds flown towards the boost
    pub(super) acceleration_elapsed: f32,
    /// Boost already applied (fires once, survives the impact)
    pub(super) has_accelerated: bool,
    /// Seconds until the next smoke puff
    pub(super) smoke_countdown: f32,
    /// Collision effect being dragged along, if any
    pub(super) follow: Option<FollowTask>,
    pub(super) rng: Pcg32,
    pub(super) events: Vec<MissileEvent>,
}

impl MiningMissile {
    /// Spawn a missile: slow it to its launch fraction and arm its damage.
    ///
    /// `tuning` is trusted here; run [`MissileTuning::validate`] when it
    /// comes from outside.
    pub fn spawn(tuning: MissileTuning, mut services: MissileServices, seed: u64) -> Self {
        if let Some(body) = services.body.as_mut() {
            let vel = body.velocity();
            body.set_velocity(vel * tuning.start_speed_fraction);
        }

        if let (Some(stats), Some(damage)) = (services.stats.as_ref(), services.damage.as_mut()) {
            damage.change_damage(stats.mining_skill());
        }

        Self {
            stage: Stage::Flying,
            remaining_lifetime: tuning.lifetime_secs,
            acceleration_elapsed: 0.0,
            has_accelerated: false,
            smoke_countdown: tuning.smoke_base_interval,
            follow: None,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            tuning,
            services,
        }
    }

    pub fn phase(&self) -> MissilePhase {
        match self.stage {
            Stage::Flying => MissilePhase::Flying {
                accelerated: self.has_accelerated,
            },
            Stage::Destroying => MissilePhase::Destroying,
            Stage::Destroyed(cause) => MissilePhase::Destroyed { cause },
        }
    }

    pub fn tuning(&self) -> &MissileTuning {
        &self.tuning
    }

    /// True until the missile is destroyed (including while `Destroying`)
    pub fn is_alive(&self) -> bool {
        !self.is_destroyed()
    }

    pub fn is_destroyed(&self) -> bool {
        matches!(self.stage, Stage::Destroyed(_))
    }

    pub fn has_accelerated(&self) -> bool {
        self.has_accelerated
    }

    pub fn remaining_lifetime(&self) -> f32 {
        self.remaining_lifetime
    }

    /// Whether a collision effect is still being dragged along
    pub fn is_following(&self) -> bool {
        self.follow.is_some()
    }

    /// Body position, or the origin when there is no body
    pub fn position(&self) -> Vec2 {
        self.services
            .body
            .as_ref()
            .map(|b| b.position())
            .unwrap_or(Vec2::ZERO)
    }

    /// Body velocity, or zero when there is no body
    pub fn velocity(&self) -> Vec2 {
        self.services
            .body
            .as_ref()
            .map(|b| b.velocity())
            .unwrap_or(Vec2::ZERO)
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<MissileEvent> {
        std::mem::take(&mut self.events)
    }
}
