//! Falling pickups: health items and power-ups

use glam::Vec2;

use super::collision::Circle;
use super::state::Playfield;
use crate::consts::{HEALTH_ITEM_SPEED, ITEM_RADIUS, POWER_UP_SPEED};

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    /// Short shot cooldown
    RapidFire,
    /// Five-bullet fan with a longer cooldown
    Shotgun,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 2] = [PowerUpKind::RapidFire, PowerUpKind::Shotgun];

    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::RapidFire => "Rapid Fire",
            PowerUpKind::Shotgun => "Shotgun",
        }
    }
}

/// Restores one point of player health
#[derive(Debug, Clone)]
pub struct HealthItem {
    pub pos: Vec2,
    pub speed: f32,
    pub radius: f32,
    /// Color cycle position in [0, 1)
    pub hue: f32,
}

impl HealthItem {
    pub fn new(pos: Vec2, hue: f32) -> Self {
        Self {
            pos,
            speed: HEALTH_ITEM_SPEED,
            radius: ITEM_RADIUS,
            hue: hue.rem_euclid(1.0),
        }
    }

    pub fn advance(&mut self) {
        self.pos.y += self.speed;
        self.hue = (self.hue + 0.005).rem_euclid(1.0);
    }

    pub fn is_below(&self, field: &Playfield) -> bool {
        self.pos.y - self.radius > field.height
    }
}

impl Circle for HealthItem {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

/// A falling power-up capsule
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub pos: Vec2,
    pub speed: f32,
    pub radius: f32,
    pub kind: PowerUpKind,
}

impl PowerUp {
    pub fn new(pos: Vec2, kind: PowerUpKind) -> Self {
        Self {
            pos,
            speed: POWER_UP_SPEED,
            radius: ITEM_RADIUS,
            kind,
        }
    }

    pub fn advance(&mut self) {
        self.pos.y += self.speed;
    }

    pub fn is_below(&self, field: &Playfield) -> bool {
        self.pos.y - self.radius > field.height
    }
}

impl Circle for PowerUp {
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

    #[test]
    fn test_items_fall_and_leave() {
        let field = Playfield::new(200.0, 100.0);
        let mut item = HealthItem::new(Vec2::new(50.0, 100.0), 0.999);
        item.advance();
        assert_eq!(item.pos.y, 105.0);
        assert!(item.hue < 1.0);
        assert!(!item.is_below(&field));
        for _ in 0..3 {
            item.advance();
        }
        assert!(item.is_below(&field));

        let mut power = PowerUp::new(Vec2::new(50.0, 0.0), PowerUpKind::Shotgun);
        power.advance();
        assert_eq!(power.pos, Vec2::new(50.0, 3.0));
    }
}
