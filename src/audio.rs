//! Sound effects
//!
//! The simulation only names sounds; a [`SoundPlayer`] sink does the actual
//! playback. Native builds log what would play.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Game start
    Intro,
    /// Torpedo launched
    LaserShot,
    /// Obstacle destroyed by a torpedo
    ObstacleExplode,
    /// Ship destroyed
    ShipExplode,
    /// Shield absorbed a hit
    Tackle,
}

impl SoundEffect {
    pub fn file_name(&self) -> &'static str {
        match self {
            SoundEffect::Intro => "tomBrady.mp3",
            SoundEffect::LaserShot => "laserShot.wav",
            SoundEffect::ObstacleExplode => "darkExplosion.wav",
            SoundEffect::ShipExplode => "explosion.wav",
            SoundEffect::Tackle => "claySound.wav",
        }
    }
}

/// Playback backend
pub trait SoundPlayer {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Sink that logs instead of playing
#[derive(Debug, Default)]
pub struct LogPlayer;

impl SoundPlayer for LogPlayer {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("Play {} at volume {:.2}", effect.file_name(), volume);
    }
}

/// Audio manager for the game
pub struct AudioManager<P: SoundPlayer = LogPlayer> {
    player: P,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager<LogPlayer> {
    fn default() -> Self {
        Self::new(LogPlayer)
    }
}

impl<P: SoundPlayer> AudioManager<P> {
    pub fn new(player: P) -> Self {
        Self {
            player,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    pub fn from_settings(player: P, settings: &crate::Settings) -> Self {
        let mut audio = Self::new(player);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);
        audio
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
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.player.play(effect, vol);
    }

    /// Play every sound queued in a frame's events, in order
    pub fn play_events(&mut self, events: &[GameEvent]) {
        for event in events {
            if let GameEvent::Sound(effect) = event {
                self.play(*effect);
            }
        }
    }

    pub fn player(&self) -> &P {
        &self.player
    }
}
