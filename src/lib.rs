//! Mining Missile - projectile behavior for a mining ship's missiles
//!
//! Core modules:
//! - `sim`: Frame-driven missile behavior and the host capabilities it drives
//! - `audio`: Sound effect clips and playback
//! - `tuning`: Data-driven missile configuration

pub mod audio;
pub mod sim;
pub mod tuning;

pub use audio::{AudioClip, SfxManager, SfxPlayer};
pub use sim::{MiningMissile, MissileEvent, MissilePhase, MissileServices};
pub use tuning::{MissileTuning, TuningError};

/// Behavior constants
pub mod consts {
    /// Demo frame step (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Maximum frames the demo loop will run before giving up
    pub const MAX_DEMO_FRAMES: u32 = 60 * 60;

    /// Trigger tag that starts the impact sequence
    pub const OBSTACLE_TAG: &str = "Obstacle";

    /// Smoke jitter defaults (seconds added to the base interval)
    pub const SMOKE_JITTER_MIN: f32 = 0.05;
    pub const SMOKE_JITTER_MAX: f32 = 0.3;
}
