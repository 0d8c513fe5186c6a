//! Frame-driven missile simulation
//!
//! All missile behavior lives here and runs on the host's frame loop:
//! - `update(dt)` once per frame
//! - `on_trigger_enter(tag)` on overlap-begin
//! - Seeded RNG only, so a seed replays the same smoke trail

pub mod follow;
pub mod host;
pub mod particles;
pub mod state;
pub mod tick;

pub use follow::FollowTask;
pub use host::{
    Damage, DamageCarrier, KinematicBody, MissileServices, PhysicsBody, PlayerStats,
    StatsProvider,
};
pub use particles::{ParticleField, ParticleHandle, ParticleSpawner, ParticleTemplate};
pub use state::{DestroyCause, MiningMissile, MissileEvent, MissilePhase};
