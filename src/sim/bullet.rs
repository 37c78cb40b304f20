//! Projectiles

use glam::Vec2;

use super::collision::Circle;
use super::state::Playfield;
use crate::consts::BULLET_RADIUS;

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletOwner {
    Player,
    Enemy,
    Boss,
}

impl BulletOwner {
    /// Bullets that can hurt the player
    pub fn is_hostile(self) -> bool {
        !matches!(self, BulletOwner::Player)
    }
}

/// A bullet in flight
#[derive(Debug, Clone)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: i32,
    pub owner: BulletOwner,
}

impl Bullet {
    pub fn new(pos: Vec2, vel: Vec2, damage: i32, owner: BulletOwner) -> Self {
        Self {
            pos,
            vel,
            radius: BULLET_RADIUS,
            damage,
            owner,
        }
    }

    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    /// True once the bullet is fully outside the playfield
    pub fn is_off_screen(&self, field: &Playfield) -> bool {
        self.pos.x < -self.radius
            || self.pos.x > field.width + self.radius
            || self.pos.y < -self.radius
            || self.pos.y > field.height + self.radius
    }
}

impl Circle for Bullet {
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
    fn test_advance_and_cull() {
        let field = Playfield::new(100.0, 100.0);
        let mut bullet = Bullet::new(Vec2::new(50.0, 8.0), Vec2::new(0.0, -10.0), 1, BulletOwner::Player);
        bullet.advance();
        assert!(!bullet.is_off_screen(&field)); // y = -2, still overlapping the edge
        bullet.advance();
        assert!(bullet.is_off_screen(&field));
    }

    #[test]
    fn test_hostility() {
        assert!(!BulletOwner::Player.is_hostile());
        assert!(BulletOwner::Enemy.is_hostile());
        assert!(BulletOwner::Boss.is_hostile());
    }
}
