//! Wave enemies with flocking-style steering

use glam::Vec2;
use rand::Rng;

use super::bullet::{Bullet, BulletOwner};
use super::collision::Circle;
use super::state::Playfield;
use crate::consts::*;

/// Height above the player that enemies hover toward
const HOVER_HEIGHT: f32 = 260.0;
/// Enemies closer than this to the player back off
const STANDOFF_RANGE: f32 = 150.0;
const SEPARATION_RADIUS: f32 = 70.0;
const EDGE_MARGIN: f32 = 80.0;
/// Enemies stay above this fraction of the playfield height
const BAND_FRACTION: f32 = 0.45;
/// Blend factor from current velocity toward the steering target
const ACCELERATION: f32 = 0.06;

const SEEK_WEIGHT: f32 = 1.0;
const SEPARATION_WEIGHT: f32 = 1.6;
const EDGE_WEIGHT: f32 = 1.2;
const BAND_WEIGHT: f32 = 1.0;
const WANDER_WEIGHT: f32 = 0.35;

#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub inner_radius: f32,
    /// Frames until the next shot
    pub shoot_timer: u32,
    /// Bullets fired since the last ingest
    pub bullets: Vec<Bullet>,
}

impl Enemy {
    pub fn new(pos: Vec2, shoot_timer: u32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: ENEMY_RADIUS,
            inner_radius: ENEMY_INNER_RADIUS,
            shoot_timer,
            bullets: Vec::new(),
        }
    }

    /// Blend the steering behaviors into a new velocity
    ///
    /// `neighbors` are the positions of every enemy at the start of the frame;
    /// the entry matching this enemy's own position is ignored.
    pub fn steer(&mut self, player_pos: Vec2, neighbors: &[Vec2], field: &Playfield, rng: &mut impl Rng) {
        let max = ENEMY_MAX_SPEED;

        let seek = if self.pos.distance(player_pos) < STANDOFF_RANGE {
            (self.pos - player_pos).normalize_or_zero() * max
        } else {
            let hover = player_pos - Vec2::new(0.0, HOVER_HEIGHT);
            (hover - self.pos).normalize_or_zero() * max
        };

        let mut separation = Vec2::ZERO;
        for &other in neighbors {
            let away = self.pos - other;
            let d = away.length();
            if d > 0.0 && d < SEPARATION_RADIUS {
                separation += away / d * (1.0 - d / SEPARATION_RADIUS);
            }
        }
        let separation = separation.clamp_length_max(1.0) * max;

        let mut edge = Vec2::ZERO;
        if self.pos.x < EDGE_MARGIN {
            edge.x = 1.0 - self.pos.x.max(0.0) / EDGE_MARGIN;
        } else if self.pos.x > field.width - EDGE_MARGIN {
            edge.x = -(1.0 - (field.width - self.pos.x).max(0.0) / EDGE_MARGIN);
        }
        let edge = edge * max;

        let mut band = Vec2::ZERO;
        let band_limit = field.height * BAND_FRACTION;
        if self.pos.y > band_limit {
            band.y = -((self.pos.y - band_limit) / EDGE_MARGIN).min(1.0);
        } else if self.pos.y < self.radius {
            band.y = 1.0;
        }
        let band = band * max;

        let wander = Vec2::new(rng.random_range(-1.0..=1.0), rng.random_range(-1.0..=1.0)) * max;

        let target = seek * SEEK_WEIGHT
            + separation * SEPARATION_WEIGHT
            + edge * EDGE_WEIGHT
            + band * BAND_WEIGHT
            + wander * WANDER_WEIGHT;

        self.vel += (target - self.vel) * ACCELERATION;
        self.vel = self.vel.clamp_length_max(max);
    }

    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    /// Count down the shot timer; fire at `target` when it runs out
    pub fn update_shooting(&mut self, target: Vec2, rng: &mut impl Rng) -> bool {
        self.shoot_timer = self.shoot_timer.saturating_sub(1);
        if self.shoot_timer == 0 {
            self.shoot_at(target);
            self.shoot_timer = rng.random_range(ENEMY_SHOOT_FRAMES_MIN..=ENEMY_SHOOT_FRAMES_MAX);
            true
        } else {
            false
        }
    }

    pub fn shoot_at(&mut self, target: Vec2) {
        let dir = (target - self.pos).normalize_or(Vec2::Y);
        self.bullets.push(Bullet::new(
            self.pos,
            dir * ENEMY_BULLET_SPEED,
            ENEMY_BULLET_DAMAGE,
            BulletOwner::Enemy,
        ));
    }

    pub fn is_below(&self, field: &Playfield) -> bool {
        self.pos.y - self.radius > field.height
    }
}

impl Circle for Enemy {
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
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_speed_is_capped() {
        let field = Playfield::new(800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(3);
        let mut enemy = Enemy::new(Vec2::new(400.0, 100.0), 90);
        let player = Vec2::new(400.0, 500.0);
        for _ in 0..600 {
            let snapshot = [enemy.pos];
            enemy.steer(player, &snapshot, &field, &mut rng);
            enemy.advance();
            assert!(enemy.vel.length() <= ENEMY_MAX_SPEED + 1e-4);
        }
        // Banding keeps enemies in the upper part of the field
        assert!(enemy.pos.y < field.height * 0.6);
    }

    #[test]
    fn test_separation_pushes_apart() {
        let field = Playfield::new(800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(11);
        let mut a = Enemy::new(Vec2::new(390.0, 100.0), 90);
        let mut b = Enemy::new(Vec2::new(410.0, 100.0), 90);
        let player = Vec2::new(400.0, 560.0);
        let start = a.pos.distance(b.pos);
        for _ in 0..30 {
            let snapshot = [a.pos, b.pos];
            a.steer(player, &snapshot, &field, &mut rng);
            b.steer(player, &snapshot, &field, &mut rng);
            a.advance();
            b.advance();
        }
        assert!(a.pos.distance(b.pos) > start);
    }

    #[test]
    fn test_edge_avoidance() {
        let field = Playfield::new(800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(5);
        let mut enemy = Enemy::new(Vec2::new(5.0, 100.0), 90);
        let player = Vec2::new(5.0, 560.0);
        for _ in 0..60 {
            let snapshot = [enemy.pos];
            enemy.steer(player, &snapshot, &field, &mut rng);
            enemy.advance();
        }
        assert!(enemy.pos.x > 5.0);
    }

    #[test]
    fn test_shoot_timer() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut enemy = Enemy::new(Vec2::new(100.0, 100.0), 2);
        let target = Vec2::new(100.0, 400.0);
        assert!(!enemy.update_shooting(target, &mut rng));
        assert!(enemy.update_shooting(target, &mut rng));
        assert_eq!(enemy.bullets.len(), 1);
        assert!((60..=120).contains(&enemy.shoot_timer));

        let bullet = &enemy.bullets[0];
        assert_eq!(bullet.owner, BulletOwner::Enemy);
        assert!((bullet.vel - Vec2::new(0.0, ENEMY_BULLET_SPEED)).length() < 1e-4);
    }
}
