//! Input mapping
//!
//! Held keys arrive as a [`KeyState`] snapshot each frame; button clicks
//! arrive as discrete [`UiAction`]s.

use crate::sim::{TickInput, WeaponMode};

/// Keys held this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
    /// Z
    pub select_basic: bool,
    /// X
    pub select_spread: bool,
}

impl KeyState {
    /// Convert to simulation input. Left wins over right, up over down.
    pub fn to_tick_input(&self) -> TickInput {
        let move_x = if self.left {
            -1
        } else if self.right {
            1
        } else {
            0
        };
        let move_y = if self.up {
            -1
        } else if self.down {
            1
        } else {
            0
        };
        let weapon_mode = if self.select_basic {
            Some(WeaponMode::Basic)
        } else if self.select_spread {
            Some(WeaponMode::Spread)
        } else {
            None
        };
        TickInput {
            move_x,
            move_y,
            fire: self.fire,
            weapon_mode,
            autopilot: false,
        }
    }
}

/// Which ship-builder catalog a selection action targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartSlot {
    Hull,
    Color,
    Nozzle,
}

/// Discrete button clicks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Play,
    OpenShipBuilder,
    Back,
    Retry,
    Quit,
    /// Cycle a catalog selection backwards
    PrevPart(PartSlot),
    /// Cycle a catalog selection forwards
    NextPart(PartSlot),
    UpgradeWeapon,
    UpgradeWings,
    Confirm,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_keys_resolve() {
        let keys = KeyState {
            left: true,
            right: true,
            up: true,
            down: true,
            ..Default::default()
        };
        let input = keys.to_tick_input();
        assert_eq!(input.move_x, -1);
        assert_eq!(input.move_y, -1);

        let keys = KeyState {
            right: true,
            down: true,
            fire: true,
            select_spread: true,
            ..Default::default()
        };
        let input = keys.to_tick_input();
        assert_eq!((input.move_x, input.move_y), (1, 1));
        assert!(input.fire);
        assert_eq!(input.weapon_mode, Some(WeaponMode::Spread));
    }

    #[test]
    fn test_idle_keys() {
        assert_eq!(KeyState::default().to_tick_input(), TickInput::default());
    }
}
