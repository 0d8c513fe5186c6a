//! Sound effect playback
//!
//! The missile only ever asks for a clip to be played. Mixing, streaming and
//! asset loading belong to whatever host implements [`SfxPlayer`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an audio clip asset (e.g. `"impact_rock_01"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioClip(pub String);

impl AudioClip {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for AudioClip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fire-and-forget sound effect playback
pub trait SfxPlayer {
    fn play_sfx(&mut self, clip: &AudioClip);
}

/// Sound effect manager that logs playback at the effective volume
///
/// Stands in for a real mixer in the headless demo.
#[derive(Debug, Clone)]
pub struct SfxManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    played: Vec<AudioClip>,
}

impl Default for SfxManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SfxManager {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            played: Vec::new(),
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Clips actually played, oldest first
    pub fn played(&self) -> &[AudioClip] {
        &self.played
    }
}

impl SfxPlayer for SfxManager {
    fn play_sfx(&mut self, clip: &AudioClip) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            log::debug!("Skipping {} (muted)", clip);
            return;
        }
        log::debug!("Playing {} at volume {:.2}", clip, vol);
        self.played.push(clip.clone());
    }
}
