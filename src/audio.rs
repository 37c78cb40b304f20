//! Audio triggers
//!
//! The game never plays sound directly: frames produce [`GameEvent`]s and the
//! [`AudioManager`] turns them into fire-and-forget [`SoundEffect`]s on a
//! backend [`AudioSink`]. The headless build logs them.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player fired
    Shoot,
    /// Enemy or boss destroyed
    Explosion,
    /// Player took damage
    PlayerHit,
    /// Health or power-up collected
    Pickup,
    /// Boss shockwave released
    Shockwave,
    /// Level cleared
    LevelUp,
    /// Countdown 3, 2, 1
    Countdown,
    /// Countdown "Go!"
    CountdownFinal,
    /// Player destroyed
    GameOver,
}

impl SoundEffect {
    /// Sound for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::ShotFired => Some(SoundEffect::Shoot),
            GameEvent::EnemyDestroyed { .. } | GameEvent::BossDestroyed { .. } => Some(SoundEffect::Explosion),
            GameEvent::PlayerHit { .. } => Some(SoundEffect::PlayerHit),
            GameEvent::HealthPickedUp | GameEvent::PowerUpPickedUp(_) => Some(SoundEffect::Pickup),
            GameEvent::BossSpecial { .. } => Some(SoundEffect::Shockwave),
            GameEvent::LevelUp { .. } => Some(SoundEffect::LevelUp),
            GameEvent::CountdownTick(_) => Some(SoundEffect::Countdown),
            GameEvent::CountdownGo => Some(SoundEffect::CountdownFinal),
            GameEvent::PlayerDestroyed => Some(SoundEffect::GameOver),
            GameEvent::BossSpawned { .. } | GameEvent::BossHit { .. } | GameEvent::PowerUpExpired => None,
        }
    }
}

/// Playback backend
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Backend that only logs
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("Sound {:?} at volume {:.2}", effect, volume);
    }
}

/// Audio manager for the game
#[derive(Debug)]
pub struct AudioManager<S: AudioSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    pub fn from_settings(sink: S, settings: &Settings) -> Self {
        let mut audio = Self::new(sink);
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
        self.sink.play(effect, vol);
    }

    /// Play whatever sounds a frame's events call for
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
