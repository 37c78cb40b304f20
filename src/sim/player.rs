//! The player's ship

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bullet::{Bullet, BulletOwner};
use super::collision::Circle;
use super::pickup::PowerUpKind;
use super::state::Playfield;
use crate::consts::*;

/// Base firing pattern, switchable in play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponMode {
    #[default]
    Basic,
    Spread,
}

/// A power-up currently affecting the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    /// Clock time (ms) at which the effect ends
    pub expires_at_ms: u64,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    /// Movement intent, each axis in {-1, 0, 1}
    pub intent: Vec2,
    pub radius: f32,
    pub health: i32,
    pub max_health: i32,
    pub credits: u32,
    pub weapon_level: u8,
    pub wing_level: u8,
    pub weapon_mode: WeaponMode,
    pub power_up: Option<ActivePowerUp>,
    /// Bullets fired since the last ingest
    pub bullets: Vec<Bullet>,
    last_shot_ms: Option<u64>,
}

/// Velocity for a bullet leaving `angle` radians off straight up
fn upward(angle: f32, speed: f32) -> Vec2 {
    Vec2::new(angle.sin() * speed, -angle.cos() * speed)
}

impl Player {
    pub fn new(field: &Playfield) -> Self {
        Self {
            pos: Self::spawn_point(field),
            intent: Vec2::ZERO,
            radius: PLAYER_RADIUS,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            credits: 0,
            weapon_level: 1,
            wing_level: 1,
            weapon_mode: WeaponMode::Basic,
            power_up: None,
            bullets: Vec::new(),
            last_shot_ms: None,
        }
    }

    pub fn spawn_point(field: &Playfield) -> Vec2 {
        Vec2::new(field.width / 2.0, field.height - PLAYER_SPAWN_OFFSET)
    }

    /// Return to the start of a run. Credits and upgrades carry over.
    pub fn reset(&mut self, field: &Playfield) {
        self.pos = Self::spawn_point(field);
        self.intent = Vec2::ZERO;
        self.health = self.max_health;
        self.power_up = None;
        self.bullets.clear();
        self.last_shot_ms = None;
    }

    /// Set movement intent from input (values are clamped to [-1, 1])
    pub fn set_intent(&mut self, dx: i8, dy: i8) {
        self.intent = Vec2::new(dx.clamp(-1, 1) as f32, dy.clamp(-1, 1) as f32);
    }

    pub fn speed(&self) -> f32 {
        PLAYER_BASE_SPEED + (self.wing_level.saturating_sub(1)) as f32 * PLAYER_SPEED_PER_WING
    }

    /// Advance by intent * speed, staying inside the lower half of the field
    pub fn update_position(&mut self, field: &Playfield) {
        let next = self.pos + self.intent * self.speed();
        let min_x = self.radius;
        let max_x = (field.width - self.radius).max(min_x);
        let min_y = field.height / 2.0;
        let max_y = (field.height - self.radius).max(min_y);
        self.pos = Vec2::new(next.x.clamp(min_x, max_x), next.y.clamp(min_y, max_y));
    }

    /// Current delay between shots
    pub fn shot_cooldown_ms(&self) -> u64 {
        match self.power_up.map(|p| p.kind) {
            Some(PowerUpKind::RapidFire) => RAPID_FIRE_COOLDOWN_MS,
            Some(PowerUpKind::Shotgun) => SHOTGUN_COOLDOWN_MS,
            None => SHOT_COOLDOWN_MS,
        }
    }

    /// Fire if the cooldown has elapsed. Returns whether a shot was fired.
    pub fn shoot(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.last_shot_ms {
            if now_ms.saturating_sub(last) < self.shot_cooldown_ms() {
                return false;
            }
        }
        self.last_shot_ms = Some(now_ms);

        let muzzle = self.pos - Vec2::new(0.0, self.radius);
        let speed = PLAYER_BULLET_SPEED;
        let mut fire = |offset: Vec2, angle: f32| {
            self.bullets
                .push(Bullet::new(muzzle + offset, upward(angle, speed), 1, BulletOwner::Player));
        };

        match self.power_up.map(|p| p.kind) {
            Some(PowerUpKind::Shotgun) => {
                let count = 5;
                let spread = 45f32.to_radians();
                let step = spread / (count - 1) as f32;
                for i in 0..count {
                    fire(Vec2::ZERO, -spread / 2.0 + step * i as f32);
                }
            }
            _ => {
                fire(Vec2::ZERO, 0.0);
                if self.weapon_mode == WeaponMode::Spread {
                    let angle = 15f32.to_radians();
                    fire(Vec2::ZERO, -angle);
                    fire(Vec2::ZERO, angle);
                }
            }
        }

        if self.weapon_level >= 2 {
            let dx = self.radius * 0.6;
            fire(Vec2::new(-dx, self.radius * 0.5), 0.0);
            fire(Vec2::new(dx, self.radius * 0.5), 0.0);
        }
        if self.weapon_level >= 3 {
            let angle = 8f32.to_radians();
            fire(Vec2::new(-self.radius, self.radius), -angle);
            fire(Vec2::new(self.radius, self.radius), angle);
        }

        true
    }

    pub fn activate_power_up(&mut self, kind: PowerUpKind, now_ms: u64) {
        self.power_up = Some(ActivePowerUp {
            kind,
            expires_at_ms: now_ms + POWER_UP_DURATION_MS,
        });
    }

    /// Drop an expired power-up. Returns true if one expired this call.
    pub fn update_power_up(&mut self, now_ms: u64) -> bool {
        match self.power_up {
            Some(active) if now_ms >= active.expires_at_ms => {
                self.power_up = None;
                true
            }
            _ => false,
        }
    }

    /// Remaining power-up time in ms
    pub fn power_up_remaining_ms(&self, now_ms: u64) -> u64 {
        self.power_up
            .map(|p| p.expires_at_ms.saturating_sub(now_ms))
            .unwrap_or(0)
    }

    /// Apply damage, clamping at zero. Returns true if the ship is destroyed.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.health = (self.health - amount.max(0)).clamp(0, self.max_health);
        self.is_dead()
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount.max(0)).clamp(0, self.max_health);
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn add_credits(&mut self, amount: u32) {
        self.credits = self.credits.saturating_add(amount);
    }

    pub fn set_weapon_mode(&mut self, mode: WeaponMode) {
        self.weapon_mode = mode;
    }
}

impl Circle for Player {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> Playfield {
        Playfield::new(800.0, 600.0)
    }

    #[test]
    fn test_movement_is_clamped_to_lower_half() {
        let field = field();
        let mut player = Player::new(&field);
        player.set_intent(0, -1);
        for _ in 0..500 {
            player.update_position(&field);
        }
        assert_eq!(player.pos.y, 300.0);

        player.set_intent(1, 1);
        for _ in 0..500 {
            player.update_position(&field);
        }
        assert_eq!(player.pos, Vec2::new(780.0, 580.0));

        player.set_intent(-5, 0);
        assert_eq!(player.intent, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_wings_increase_speed() {
        let mut player = Player::new(&field());
        assert_eq!(player.speed(), 5.0);
        player.wing_level = 3;
        assert_eq!(player.speed(), 7.0);
    }

    #[test]
    fn test_shot_cooldown() {
        let mut player = Player::new(&field());
        assert!(player.shoot(1_000));
        assert_eq!(player.bullets.len(), 1);
        assert!(!player.shoot(1_299));
        assert!(player.shoot(1_300));
        assert_eq!(player.bullets.len(), 2);
        assert!(player.bullets.iter().all(|b| b.owner == BulletOwner::Player));
    }

    #[test]
    fn test_rapid_fire_expires_after_thirty_seconds() {
        let mut player = Player::new(&field());
        player.activate_power_up(PowerUpKind::RapidFire, 5_000);
        assert_eq!(player.shot_cooldown_ms(), 100);

        assert!(!player.update_power_up(5_000 + 29_999));
        assert_eq!(player.shot_cooldown_ms(), 100);

        assert!(player.update_power_up(5_000 + 30_000));
        assert!(player.power_up.is_none());
        assert_eq!(player.shot_cooldown_ms(), SHOT_COOLDOWN_MS);
    }

    #[test]
    fn test_shotgun_fires_fan() {
        let mut player = Player::new(&field());
        player.activate_power_up(PowerUpKind::Shotgun, 0);
        assert_eq!(player.shot_cooldown_ms(), 500);
        assert!(player.shoot(0));
        assert_eq!(player.bullets.len(), 5);
        // Symmetric fan
        let sum_vx: f32 = player.bullets.iter().map(|b| b.vel.x).sum();
        assert!(sum_vx.abs() < 1e-4);
        assert!(player.bullets.iter().all(|b| b.vel.y < 0.0));
    }

    #[test]
    fn test_weapon_levels_and_spread_add_bullets() {
        let mut player = Player::new(&field());
        player.weapon_level = 2;
        assert!(player.shoot(0));
        assert_eq!(player.bullets.len(), 3);

        player.bullets.clear();
        player.weapon_level = 3;
        player.set_weapon_mode(WeaponMode::Spread);
        assert!(player.shoot(1_000));
        assert_eq!(player.bullets.len(), 7);
    }

    #[test]
    fn test_health_is_clamped() {
        let mut player = Player::new(&field());
        player.heal(5);
        assert_eq!(player.health, player.max_health);
        assert!(!player.take_damage(9));
        assert!(player.take_damage(7));
        assert_eq!(player.health, 0);
    }

    #[test]
    fn test_reset_keeps_progression() {
        let field = field();
        let mut player = Player::new(&field);
        player.credits = 40;
        player.weapon_level = 2;
        player.take_damage(4);
        player.activate_power_up(PowerUpKind::RapidFire, 0);
        player.shoot(0);
        player.reset(&field);
        assert_eq!(player.health, player.max_health);
        assert_eq!(player.credits, 40);
        assert_eq!(player.weapon_level, 2);
        assert!(player.power_up.is_none());
        assert!(player.bullets.is_empty());
        assert!(player.shoot(0));
    }
}
