//! Ship builder catalog and purchases
//!
//! Cosmetic parts are bought once and then owned forever; upgrades are
//! bought per level. Credits always come from the player.

use thiserror::Error;

use crate::consts::{MAX_UPGRADE_LEVEL, WEAPON_UPGRADE_COST, WING_UPGRADE_COST};
use crate::persistence::Loadout;
use crate::platform::PartSlot;
use crate::sim::{Player, Rgb};

/// One purchasable cosmetic option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartOption {
    pub id: &'static str,
    pub label: &'static str,
    pub cost: u32,
    /// Tint for color options
    pub color: Option<Rgb>,
}

const fn part(id: &'static str, label: &'static str, cost: u32) -> PartOption {
    PartOption {
        id,
        label,
        cost,
        color: None,
    }
}

const fn paint(id: &'static str, label: &'static str, cost: u32, color: Rgb) -> PartOption {
    PartOption {
        id,
        label,
        cost,
        color: Some(color),
    }
}

pub const HULLS: [PartOption; 3] = [
    part("arrow", "Arrow", 0),
    part("diamond", "Diamond", 12),
    part("delta", "Delta", 18),
];

pub const COLORS: [PartOption; 4] = [
    paint("ember", "Ember", 0, Rgb(255, 120, 120)),
    paint("azure", "Azure", 6, Rgb(120, 180, 255)),
    paint("lilac", "Lilac", 8, Rgb(190, 120, 255)),
    paint("mint", "Mint", 7, Rgb(120, 255, 200)),
];

pub const NOZZLES: [PartOption; 3] = [
    part("classic", "Classic", 0),
    part("dual", "Dual", 10),
    part("vector", "Vector", 14),
];

pub fn catalog(slot: PartSlot) -> &'static [PartOption] {
    match slot {
        PartSlot::Hull => &HULLS,
        PartSlot::Color => &COLORS,
        PartSlot::Nozzle => &NOZZLES,
    }
}

pub fn find(slot: PartSlot, id: &str) -> Option<&'static PartOption> {
    catalog(slot).iter().find(|p| p.id == id)
}

/// Catalog color matching an RGB value
pub fn color_for_rgb(rgb: Rgb) -> Option<&'static PartOption> {
    COLORS.iter().find(|c| c.color == Some(rgb))
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShopError {
    #[error("Not enough credits: need {needed}, have {available}")]
    InsufficientCredits { needed: u32, available: u32 },

    #[error("{0} already at max level")]
    MaxLevel(&'static str),

    #[error("Unknown {slot:?} option '{id}'")]
    UnknownOption { slot: PartSlot, id: String },
}

/// Price of the next weapon level, None at max
pub fn weapon_upgrade_cost(level: u8) -> Option<u32> {
    (level < MAX_UPGRADE_LEVEL).then(|| WEAPON_UPGRADE_COST * level as u32)
}

/// Price of the next wing level, None at max
pub fn wing_upgrade_cost(level: u8) -> Option<u32> {
    (level < MAX_UPGRADE_LEVEL).then(|| WING_UPGRADE_COST * level as u32)
}

fn charge(player: &mut Player, cost: u32) -> Result<(), ShopError> {
    if player.credits < cost {
        return Err(ShopError::InsufficientCredits {
            needed: cost,
            available: player.credits,
        });
    }
    player.credits -= cost;
    Ok(())
}

/// Buy the next weapon level. Returns the price paid.
pub fn buy_weapon_upgrade(player: &mut Player) -> Result<u32, ShopError> {
    let cost = weapon_upgrade_cost(player.weapon_level).ok_or(ShopError::MaxLevel("Weapon"))?;
    charge(player, cost)?;
    player.weapon_level += 1;
    log::info!("Weapon upgraded to level {} for {} credits", player.weapon_level, cost);
    Ok(cost)
}

/// Buy the next wing level. Returns the price paid.
pub fn buy_wing_upgrade(player: &mut Player) -> Result<u32, ShopError> {
    let cost = wing_upgrade_cost(player.wing_level).ok_or(ShopError::MaxLevel("Wings"))?;
    charge(player, cost)?;
    player.wing_level += 1;
    log::info!("Wings upgraded to level {} for {} credits", player.wing_level, cost);
    Ok(cost)
}

/// Current ship builder selection, as catalog indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shipyard {
    hull: usize,
    color: usize,
    nozzle: usize,
}

fn index_of(slot: PartSlot, id: &str) -> usize {
    catalog(slot).iter().position(|p| p.id == id).unwrap_or(0)
}

impl Shipyard {
    /// Start from the equipped parts
    pub fn from_loadout(loadout: &Loadout) -> Self {
        Self {
            hull: index_of(PartSlot::Hull, &loadout.hull_type),
            color: index_of(PartSlot::Color, loadout.color_id()),
            nozzle: index_of(PartSlot::Nozzle, &loadout.nozzle_type),
        }
    }

    fn slot_index(&mut self, slot: PartSlot) -> &mut usize {
        match slot {
            PartSlot::Hull => &mut self.hull,
            PartSlot::Color => &mut self.color,
            PartSlot::Nozzle => &mut self.nozzle,
        }
    }

    /// Move a selection by `step`, wrapping at both ends
    pub fn cycle(&mut self, slot: PartSlot, step: isize) {
        let len = catalog(slot).len() as isize;
        let index = self.slot_index(slot);
        *index = (*index as isize + step).rem_euclid(len) as usize;
    }

    pub fn selected(&self, slot: PartSlot) -> &'static PartOption {
        let index = match slot {
            PartSlot::Hull => self.hull,
            PartSlot::Color => self.color,
            PartSlot::Nozzle => self.nozzle,
        };
        &catalog(slot)[index]
    }

    /// Jump straight to a catalog entry (color swatch clicks)
    pub fn select(&mut self, slot: PartSlot, id: &str) -> Result<(), ShopError> {
        let position = catalog(slot).iter().position(|p| p.id == id).ok_or_else(|| {
            ShopError::UnknownOption {
                slot,
                id: id.to_string(),
            }
        })?;
        *self.slot_index(slot) = position;
        Ok(())
    }

    /// Total price of the selected parts not yet owned
    pub fn pending_cost(&self, loadout: &Loadout) -> u32 {
        [PartSlot::Hull, PartSlot::Color, PartSlot::Nozzle]
            .into_iter()
            .map(|slot| self.selected(slot))
            .zip([&loadout.owned_hulls, &loadout.owned_colors, &loadout.owned_nozzles])
            .filter(|(part, owned)| !owned.contains(part.id))
            .map(|(part, _)| part.cost)
            .sum()
    }

    /// Buy anything unowned in the selection and equip it. Returns the price paid.
    pub fn confirm(&self, loadout: &mut Loadout, player: &mut Player) -> Result<u32, ShopError> {
        let cost = self.pending_cost(loadout);
        charge(player, cost)?;

        let hull = self.selected(PartSlot::Hull);
        let color = self.selected(PartSlot::Color);
        let nozzle = self.selected(PartSlot::Nozzle);
        loadout.owned_hulls.insert(hull.id.to_string());
        loadout.owned_colors.insert(color.id.to_string());
        loadout.owned_nozzles.insert(nozzle.id.to_string());
        loadout.hull_type = hull.id.to_string();
        loadout.nozzle_type = nozzle.id.to_string();
        loadout.ship_color = color.color.map(|Rgb(r, g, b)| [r, g, b]);
        loadout.custom_color = true;

        log::info!(
            "Equipped {} hull, {} paint, {} nozzle for {} credits",
            hull.label,
            color.label,
            nozzle.label,
            cost
        );
        Ok(cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Playfield;

    fn player_with(credits: u32) -> Player {
        let mut player = Player::new(&Playfield::default());
        player.credits = credits;
        player
    }

    #[test]
    fn test_upgrade_costs_scale_with_level() {
        assert_eq!(weapon_upgrade_cost(1), Some(6));
        assert_eq!(weapon_upgrade_cost(2), Some(12));
        assert_eq!(weapon_upgrade_cost(3), None);
        assert_eq!(wing_upgrade_cost(2), Some(10));
    }

    #[test]
    fn test_buy_upgrades() {
        let mut player = player_with(23);
        assert_eq!(buy_weapon_upgrade(&mut player), Ok(6));
        assert_eq!(player.weapon_level, 2);
        assert_eq!(player.credits, 17);
        assert_eq!(buy_weapon_upgrade(&mut player), Ok(12));
        assert_eq!(buy_weapon_upgrade(&mut player), Err(ShopError::MaxLevel("Weapon")));
        assert_eq!(buy_wing_upgrade(&mut player), Ok(5));
        assert_eq!(
            buy_wing_upgrade(&mut player),
            Err(ShopError::InsufficientCredits { needed: 10, available: 0 })
        );
        assert_eq!(player.wing_level, 2);
    }

    #[test]
    fn test_cycle_wraps() {
        let mut yard = Shipyard::from_loadout(&Loadout::default());
        assert_eq!(yard.selected(PartSlot::Hull).id, "arrow");
        yard.cycle(PartSlot::Hull, -1);
        assert_eq!(yard.selected(PartSlot::Hull).id, "delta");
        yard.cycle(PartSlot::Hull, 1);
        yard.cycle(PartSlot::Color, 4);
        assert_eq!(yard.selected(PartSlot::Hull).id, "arrow");
        assert_eq!(yard.selected(PartSlot::Color).id, "ember");
    }

    #[test]
    fn test_select_by_id() {
        let mut yard = Shipyard::from_loadout(&Loadout::default());
        assert!(yard.select(PartSlot::Color, "mint").is_ok());
        assert_eq!(yard.selected(PartSlot::Color).cost, 7);
        assert!(matches!(
            yard.select(PartSlot::Hull, "saucer"),
            Err(ShopError::UnknownOption { slot: PartSlot::Hull, .. })
        ));
    }

    #[test]
    fn test_confirm_charges_only_unowned() {
        let mut loadout = Loadout::default();
        let mut player = player_with(30);
        let mut yard = Shipyard::from_loadout(&loadout);
        yard.cycle(PartSlot::Hull, 1); // diamond 12
        yard.cycle(PartSlot::Color, 1); // azure 6
        assert_eq!(yard.pending_cost(&loadout), 18);

        assert_eq!(yard.confirm(&mut loadout, &mut player), Ok(18));
        assert_eq!(player.credits, 12);
        assert_eq!(loadout.hull_type, "diamond");
        assert_eq!(loadout.ship_color, Some([120, 180, 255]));
        assert!(loadout.custom_color);
        assert!(loadout.owned_hulls.contains("diamond"));

        // Already owned now
        assert_eq!(yard.pending_cost(&loadout), 0);
        assert_eq!(yard.confirm(&mut loadout, &mut player), Ok(0));
        assert_eq!(player.credits, 12);
    }

    #[test]
    fn test_confirm_without_credits_changes_nothing() {
        let mut loadout = Loadout::default();
        let mut player = player_with(5);
        let mut yard = Shipyard::from_loadout(&loadout);
        yard.cycle(PartSlot::Nozzle, 2); // vector 14
        assert!(matches!(
            yard.confirm(&mut loadout, &mut player),
            Err(ShopError::InsufficientCredits { needed: 14, .. })
        ));
        assert_eq!(loadout.nozzle_type, "classic");
        assert_eq!(player.credits, 5);
    }
}
