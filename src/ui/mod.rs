//! Presentation-side state that isn't simulation
//!
//! - `dialog`: queued speech bubbles
//! - `Hud`: read-only snapshot of the numbers shown during play

pub mod dialog;

pub use dialog::{Dialog, DialogLine};

use std::fmt;

use crate::sim::{PowerUpKind, WeaponMode, World};

/// Heads-up display values for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub score: u64,
    pub level: u32,
    pub health: i32,
    pub max_health: i32,
    pub credits: u32,
    pub weapon_mode: WeaponMode,
    /// Active power-up and its remaining time
    pub power_up: Option<(PowerUpKind, u64)>,
    pub boss_health: Option<(i32, i32)>,
    pub elapsed_secs: f64,
}

impl Hud {
    pub fn from_world(world: &World, now_ms: u64, elapsed_secs: f64) -> Self {
        let player = &world.player;
        Self {
            score: world.score,
            level: world.level,
            health: player.health,
            max_health: player.max_health,
            credits: player.credits,
            weapon_mode: player.weapon_mode,
            power_up: player
                .power_up
                .map(|p| (p.kind, player.power_up_remaining_ms(now_ms))),
            boss_health: world.boss.as_ref().map(|b| (b.health, b.max_health)),
            elapsed_secs,
        }
    }

    /// Health bar fill in [0, 1]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        (self.health as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }
}

impl fmt::Display for Hud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Score {} | Level {} | HP {}/{} | Credits {} | {:?} | {:.1}s",
            self.score, self.level, self.health, self.max_health, self.credits, self.weapon_mode, self.elapsed_secs
        )?;
        if let Some((kind, ms)) = self.power_up {
            write!(f, " | {} {}s", kind.label(), ms.div_ceil(1000))?;
        }
        if let Some((health, max)) = self.boss_health {
            write!(f, " | Boss {}/{}", health, max)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Playfield;

    #[test]
    fn test_hud_snapshot() {
        let mut world = World::new(Playfield::default(), 3);
        world.score = 42;
        world.player.take_damage(4);
        world.player.activate_power_up(PowerUpKind::Shotgun, 0);

        let hud = Hud::from_world(&world, 10_500, 12.0);
        assert_eq!(hud.health_fraction(), 0.6);
        assert_eq!(hud.power_up, Some((PowerUpKind::Shotgun, 19_500)));
        let text = hud.to_string();
        assert!(text.starts_with("Score 42 | Level 1 | HP 6/10"));
        assert!(text.contains("Shotgun 20s"));
        assert!(!text.contains("Boss"));
    }
}
