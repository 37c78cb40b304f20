//! Game settings and preferences
//!
//! Stored as JSON next to the save file. Every field has a default, so older
//! or partial files keep working.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{BOSS_INTERVAL, DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH};
use crate::persistence::{PersistError, read_optional, write_atomic};
use crate::sim::Playfield;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    pub screen_width: f32,
    pub screen_height: f32,
    /// Fixed RNG seed; a fresh one per launch when unset
    pub seed: Option<u64>,
    /// Every Nth level is a boss level
    pub boss_interval: u32,

    // === Files ===
    pub save_path: PathBuf,
    pub scores_path: PathBuf,

    // === Visual Effects ===
    /// Screen shake on hits and boss specials
    pub screen_shake: bool,
    /// Full-screen flash on hits
    pub screen_flash: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (no shake, no flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
            seed: None,
            boss_interval: BOSS_INTERVAL,

            save_path: PathBuf::from("save.json"),
            scores_path: PathBuf::from("scores.txt"),

            screen_shake: true,
            screen_flash: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    pub fn playfield(&self) -> Playfield {
        let valid = |v: f32, fallback: f32| if v.is_finite() && v > 0.0 { v } else { fallback };
        Playfield::new(
            valid(self.screen_width, DEFAULT_SCREEN_WIDTH),
            valid(self.screen_height, DEFAULT_SCREEN_HEIGHT),
        )
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective screen flash (respects reduced_motion)
    pub fn effective_screen_flash(&self) -> bool {
        self.screen_flash && !self.reduced_motion
    }

    /// Load settings; missing or corrupt files give defaults
    pub fn load(path: &Path) -> Self {
        let text = match read_optional(path) {
            Ok(Some(text)) => text,
            Ok(None) => {
                log::info!("Using default settings");
                return Self::default();
            }
            Err(e) => {
                log::warn!("{}; using default settings", e);
                return Self::default();
            }
        };
        match serde_json::from_str(&text) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Corrupt settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        write_atomic(path, &serde_json::to_string_pretty(self)?)?;
        log::info!("Settings saved");
        Ok(())
    }
}
