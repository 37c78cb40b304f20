//! Persisted ship loadout
//!
//! The save file is a flat JSON object. Every field is read on its own, so a
//! single bad value (wrong type, unknown part) only resets that field.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{PersistError, read_optional, write_atomic};
use crate::consts::MAX_UPGRADE_LEVEL;
use crate::platform::PartSlot;
use crate::shipyard;
use crate::sim::{Player, Rgb, WeaponMode};

const DEFAULT_HULL: &str = "arrow";
const DEFAULT_COLOR: &str = "ember";
const DEFAULT_NOZZLE: &str = "classic";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Loadout {
    pub credits: u32,
    pub wing_level: u8,
    pub weapon_level: u8,
    pub weapon_mode: WeaponMode,
    pub hull_type: String,
    pub nozzle_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ship_color: Option<[u8; 3]>,
    /// Use `ship_color` instead of the level palette tint
    pub custom_color: bool,
    pub owned_hulls: BTreeSet<String>,
    pub owned_colors: BTreeSet<String>,
    pub owned_nozzles: BTreeSet<String>,
}

impl Default for Loadout {
    fn default() -> Self {
        Self {
            credits: 0,
            wing_level: 1,
            weapon_level: 1,
            weapon_mode: WeaponMode::Basic,
            hull_type: DEFAULT_HULL.to_string(),
            nozzle_type: DEFAULT_NOZZLE.to_string(),
            ship_color: None,
            custom_color: false,
            owned_hulls: BTreeSet::from([DEFAULT_HULL.to_string()]),
            owned_colors: BTreeSet::from([DEFAULT_COLOR.to_string()]),
            owned_nozzles: BTreeSet::from([DEFAULT_NOZZLE.to_string()]),
        }
    }
}

/// Read one field, None if missing or of the wrong shape
fn field<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<T> {
    let value = obj.get(key)?.clone();
    match serde_json::from_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("Ignoring bad save field '{}': {}", key, e);
            None
        }
    }
}

impl Loadout {
    /// Parse save-file JSON, falling back to defaults field by field
    pub fn from_json(text: &str) -> Self {
        let value: Value = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Corrupt save file, using defaults: {}", e);
                return Self::default();
            }
        };
        let Some(obj) = value.as_object() else {
            log::warn!("Save file is not a JSON object, using defaults");
            return Self::default();
        };

        let d = Self::default();
        let mut loadout = Self {
            credits: field(obj, "credits").unwrap_or(d.credits),
            wing_level: field(obj, "wing_level").unwrap_or(d.wing_level),
            weapon_level: field(obj, "weapon_level").unwrap_or(d.weapon_level),
            weapon_mode: field(obj, "weapon_mode").unwrap_or(d.weapon_mode),
            hull_type: field(obj, "hull_type").unwrap_or(d.hull_type),
            nozzle_type: field(obj, "nozzle_type").unwrap_or(d.nozzle_type),
            ship_color: field(obj, "ship_color"),
            custom_color: field(obj, "custom_color").unwrap_or(d.custom_color),
            owned_hulls: field(obj, "owned_hulls").unwrap_or(d.owned_hulls),
            owned_colors: field(obj, "owned_colors").unwrap_or(d.owned_colors),
            owned_nozzles: field(obj, "owned_nozzles").unwrap_or(d.owned_nozzles),
        };
        loadout.normalize();
        loadout
    }

    /// Clamp levels, replace unknown parts and make sure equipped parts are owned
    fn normalize(&mut self) {
        self.wing_level = self.wing_level.clamp(1, MAX_UPGRADE_LEVEL);
        self.weapon_level = self.weapon_level.clamp(1, MAX_UPGRADE_LEVEL);
        if shipyard::find(PartSlot::Hull, &self.hull_type).is_none() {
            self.hull_type = DEFAULT_HULL.to_string();
        }
        if shipyard::find(PartSlot::Nozzle, &self.nozzle_type).is_none() {
            self.nozzle_type = DEFAULT_NOZZLE.to_string();
        }
        if self.ship_color.is_some() {
            self.custom_color = true;
        }
        self.owned_hulls.insert(self.hull_type.clone());
        self.owned_nozzles.insert(self.nozzle_type.clone());
        self.owned_colors.insert(self.color_id().to_string());
    }

    /// Catalog id of the equipped paint
    pub fn color_id(&self) -> &'static str {
        self.ship_color
            .and_then(|[r, g, b]| shipyard::color_for_rgb(Rgb(r, g, b)))
            .map(|c| c.id)
            .unwrap_or(DEFAULT_COLOR)
    }

    /// Hull tint: the bought paint, or the level's foreground color
    pub fn ship_rgb(&self, level_tint: Rgb) -> Rgb {
        match self.ship_color {
            Some([r, g, b]) if self.custom_color => Rgb(r, g, b),
            _ => level_tint,
        }
    }

    /// Copy progression onto the player at startup
    pub fn apply_to(&self, player: &mut Player) {
        player.credits = self.credits;
        player.wing_level = self.wing_level;
        player.weapon_level = self.weapon_level;
        player.weapon_mode = self.weapon_mode;
    }

    /// Pull progression back from the player before saving
    pub fn sync_from(&mut self, player: &Player) {
        self.credits = player.credits;
        self.wing_level = player.wing_level;
        self.weapon_level = player.weapon_level;
        self.weapon_mode = player.weapon_mode;
    }

    /// Load from disk; never fails
    pub fn load(path: &Path) -> Self {
        match read_optional(path) {
            Ok(Some(text)) => {
                let loadout = Self::from_json(&text);
                log::info!("Loaded loadout from {} ({} credits)", path.display(), loadout.credits);
                loadout
            }
            Ok(None) => {
                log::info!("No save file at {}, starting fresh", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("{}; using default loadout", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(self)?;
        write_atomic(path, &json)?;
        log::debug!("Loadout saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Playfield;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        let mut loadout = Loadout::default();
        loadout.credits = 42;
        loadout.weapon_level = 3;
        loadout.weapon_mode = WeaponMode::Spread;
        loadout.hull_type = "delta".to_string();
        loadout.ship_color = Some([190, 120, 255]);
        loadout.normalize();

        loadout.save(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"weapon_mode\": \"spread\""));
        assert_eq!(Loadout::load(&path), loadout);
    }

    #[test]
    fn test_missing_and_corrupt_files_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        assert_eq!(Loadout::load(&path), Loadout::default());

        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(Loadout::load(&path), Loadout::default());

        assert_eq!(Loadout::from_json("[1, 2, 3]"), Loadout::default());
    }

    #[test]
    fn test_bad_fields_fall_back_individually() {
        let loadout = Loadout::from_json(
            r#"{
                "credits": "lots",
                "wing_level": 9,
                "weapon_level": 2,
                "weapon_mode": "laser",
                "hull_type": "saucer",
                "nozzle_type": "dual",
                "ship_color": [120, 255, 200]
            }"#,
        );
        assert_eq!(loadout.credits, 0);
        assert_eq!(loadout.wing_level, MAX_UPGRADE_LEVEL);
        assert_eq!(loadout.weapon_level, 2);
        assert_eq!(loadout.weapon_mode, WeaponMode::Basic);
        assert_eq!(loadout.hull_type, "arrow");
        assert_eq!(loadout.nozzle_type, "dual");
        assert!(loadout.custom_color);
        assert_eq!(loadout.color_id(), "mint");
        assert!(loadout.owned_nozzles.contains("dual"));
        assert!(loadout.owned_colors.contains("mint"));
    }

    #[test]
    fn test_player_round_trip() {
        let mut loadout = Loadout::default();
        loadout.credits = 9;
        loadout.wing_level = 2;
        let mut player = Player::new(&Playfield::default());
        loadout.apply_to(&mut player);
        assert_eq!(player.credits, 9);
        assert_eq!(player.speed(), 6.0);

        player.add_credits(3);
        loadout.sync_from(&player);
        assert_eq!(loadout.credits, 12);
    }

    #[test]
    fn test_ship_tint() {
        let tint = Rgb(1, 2, 3);
        let mut loadout = Loadout::default();
        assert_eq!(loadout.ship_rgb(tint), tint);
        loadout.ship_color = Some([255, 120, 120]);
        loadout.custom_color = true;
        assert_eq!(loadout.ship_rgb(tint), Rgb(255, 120, 120));
    }
}
