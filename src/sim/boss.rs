//! Multi-phase boss
//!
//! The boss gets faster and more aggressive as it loses health. Phase is never
//! stored: it is recomputed from `health / max_health` whenever needed.
//!
//! Besides its regular attack patterns the boss periodically charges a
//! shockwave: once the special cooldown has elapsed it stops firing, charges
//! for [`BOSS_CHARGE_DURATION_MS`], then releases a radial burst.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::bullet::{Bullet, BulletOwner};
use super::collision::Circle;
use super::state::Playfield;
use crate::consts::*;
use crate::polar_to_cartesian;

/// Fraction of the playfield height the boss may occupy
const TOP_BAND_FRACTION: f32 = 0.35;
const ACCELERATION: f32 = 0.05;
const SHOCKWAVE_BULLETS: usize = 32;

/// Difficulty tier derived from remaining health
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BossPhase {
    /// Above two thirds health
    Full,
    /// Above one third health
    Wounded,
    /// One third health or less
    Desperate,
}

impl BossPhase {
    pub fn from_health(health: i32, max_health: i32) -> Self {
        let ratio = health as f32 / max_health.max(1) as f32;
        if ratio > 0.66 {
            BossPhase::Full
        } else if ratio > 0.33 {
            BossPhase::Wounded
        } else {
            BossPhase::Desperate
        }
    }

    pub fn index(self) -> u32 {
        match self {
            BossPhase::Full => 0,
            BossPhase::Wounded => 1,
            BossPhase::Desperate => 2,
        }
    }

    pub fn shoot_delay_ms(self) -> u64 {
        match self {
            BossPhase::Full => 2_000,
            BossPhase::Wounded => 1_500,
            BossPhase::Desperate => 1_000,
        }
    }

    pub fn bullet_speed_scale(self) -> f32 {
        1.0 + 0.2 * self.index() as f32
    }

    pub fn max_speed(self) -> f32 {
        2.0 + 0.6 * self.index() as f32
    }
}

/// Regular boss attacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackPattern {
    /// Aimed shot, one extra bullet per phase
    DirectShot,
    /// Aimed fan that widens with phase
    ShotgunSpread,
    /// Ring of bullets around the boss
    CircularBurst,
    /// Three spinning arms, desperate phase only
    SpiralVolley,
}

impl AttackPattern {
    const BASE: [AttackPattern; 3] = [
        AttackPattern::DirectShot,
        AttackPattern::ShotgunSpread,
        AttackPattern::CircularBurst,
    ];
    const EXTENDED: [AttackPattern; 4] = [
        AttackPattern::DirectShot,
        AttackPattern::ShotgunSpread,
        AttackPattern::CircularBurst,
        AttackPattern::SpiralVolley,
    ];

    /// Patterns available in a phase
    pub fn pool(phase: BossPhase) -> &'static [AttackPattern] {
        if phase >= BossPhase::Desperate {
            &Self::EXTENDED
        } else {
            &Self::BASE
        }
    }
}

#[derive(Debug, Clone)]
pub struct Boss {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub inner_radius: f32,
    pub health: i32,
    pub max_health: i32,
    /// Most recently used attack pattern
    pub pattern: AttackPattern,
    /// Bullets fired since the last ingest
    pub bullets: Vec<Bullet>,
    last_shot_ms: u64,
    last_special_ms: u64,
    /// Clock time the current charge started
    charge_started_ms: Option<u64>,
    /// Frames alive, drives the movement oscillation
    age: u32,
}

impl Boss {
    pub fn new(pos: Vec2, now_ms: u64, rng: &mut impl Rng) -> Self {
        let pattern = AttackPattern::BASE
            .choose(rng)
            .copied()
            .unwrap_or(AttackPattern::DirectShot);
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: BOSS_RADIUS,
            inner_radius: BOSS_INNER_RADIUS,
            health: BOSS_MAX_HEALTH,
            max_health: BOSS_MAX_HEALTH,
            pattern,
            bullets: Vec::new(),
            last_shot_ms: now_ms,
            last_special_ms: now_ms,
            charge_started_ms: None,
            age: 0,
        }
    }

    pub fn phase(&self) -> BossPhase {
        BossPhase::from_health(self.health, self.max_health)
    }

    pub fn is_charging(&self) -> bool {
        self.charge_started_ms.is_some()
    }

    /// Charge progress in [0, 1], or None when not charging
    pub fn charge_progress(&self, now_ms: u64) -> Option<f32> {
        self.charge_started_ms.map(|start| {
            (now_ms.saturating_sub(start) as f32 / BOSS_CHARGE_DURATION_MS as f32).min(1.0)
        })
    }

    /// Apply damage. Returns true if the boss is destroyed.
    pub fn take_hit(&mut self, damage: i32) -> bool {
        self.health = (self.health - damage).clamp(0, self.max_health);
        self.is_destroyed()
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0
    }

    /// Move, shoot and run the special-attack cycle
    ///
    /// Returns true on the frame the shockwave is released.
    pub fn update(&mut self, target: Vec2, now_ms: u64, field: &Playfield, rng: &mut impl Rng) -> bool {
        self.age = self.age.wrapping_add(1);
        self.steer(target, field, rng);
        self.pos += self.vel;
        let max_y = (field.height * TOP_BAND_FRACTION).max(self.radius);
        let max_x = (field.width - self.radius).max(self.radius);
        self.pos.x = self.pos.x.clamp(self.radius, max_x);
        self.pos.y = self.pos.y.clamp(self.radius, max_y);

        match self.charge_started_ms {
            Some(start) => {
                if now_ms.saturating_sub(start) >= BOSS_CHARGE_DURATION_MS {
                    self.fire_shockwave();
                    self.charge_started_ms = None;
                    self.last_special_ms = now_ms;
                    // Give the player a breather before regular fire resumes
                    self.last_shot_ms = now_ms;
                    return true;
                }
                return false;
            }
            None => {
                if now_ms.saturating_sub(self.last_special_ms) >= BOSS_SPECIAL_COOLDOWN_MS {
                    log::debug!("Boss charging special at {}ms", now_ms);
                    self.charge_started_ms = Some(now_ms);
                    return false;
                }
            }
        }

        if now_ms.saturating_sub(self.last_shot_ms) >= self.phase().shoot_delay_ms() {
            let pool = AttackPattern::pool(self.phase());
            self.pattern = pool.choose(rng).copied().unwrap_or(AttackPattern::DirectShot);
            self.fire_pattern(self.pattern, target);
            self.last_shot_ms = now_ms;
        }
        false
    }

    /// Seek an oscillating point above the target
    fn steer(&mut self, target: Vec2, field: &Playfield, rng: &mut impl Rng) {
        let phase = self.phase();
        let mut max_speed = phase.max_speed();
        if self.is_charging() {
            max_speed *= 0.35;
        }

        let t = self.age as f32 / SIM_HZ as f32;
        let goal = Vec2::new(
            target.x + (t * 0.9).sin() * 160.0,
            field.height * 0.15 + (t * 1.7).sin() * 25.0,
        );
        let to_goal = goal - self.pos;
        let dist = to_goal.length();
        // Ease in when close so the boss doesn't jitter around the goal
        let arrive = (dist / 60.0).min(1.0);
        let seek = to_goal.normalize_or_zero() * max_speed * arrive;

        let wander = Vec2::new(rng.random_range(-1.0..=1.0), rng.random_range(-1.0..=1.0)) * max_speed * 0.25;

        let margin = self.radius * 2.0;
        let mut edge = Vec2::ZERO;
        if self.pos.x < margin {
            edge.x = 1.0;
        } else if self.pos.x > field.width - margin {
            edge.x = -1.0;
        }
        let edge = edge * max_speed * 1.5;

        self.vel += (seek + wander + edge - self.vel) * ACCELERATION;
        self.vel = self.vel.clamp_length_max(max_speed);
    }

    /// Emit one attack pattern into the boss's bullet list
    pub fn fire_pattern(&mut self, pattern: AttackPattern, target: Vec2) {
        let phase = self.phase();
        let p = phase.index() as usize;
        let scale = phase.bullet_speed_scale();
        let aim = {
            let d = target - self.pos;
            if d.length_squared() > 0.0 { d.y.atan2(d.x) } else { TAU / 4.0 }
        };

        match pattern {
            AttackPattern::DirectShot => {
                self.fan(aim, 1 + p, 6f32.to_radians() * p as f32, 6.0 * scale);
            }
            AttackPattern::ShotgunSpread => {
                let spread = (45.0 + 10.0 * p as f32).to_radians();
                self.fan(aim, 5 + 2 * p, spread, 6.0 * scale);
            }
            AttackPattern::CircularBurst => {
                let count = 12 + 4 * p;
                let offset = self.age as f32 * 0.1;
                for i in 0..count {
                    let angle = offset + TAU * i as f32 / count as f32;
                    self.emit(angle, 4.0 * scale);
                }
            }
            AttackPattern::SpiralVolley => {
                let base = self.age as f32 * 0.15;
                for arm in 0..3 {
                    for i in 0..6 {
                        let angle = base + TAU * arm as f32 / 3.0 + 0.12 * i as f32;
                        self.emit(angle, (3.0 + 0.4 * i as f32) * scale);
                    }
                }
            }
        }
    }

    fn fire_shockwave(&mut self) {
        let speed = 5.0 * self.phase().bullet_speed_scale();
        for i in 0..SHOCKWAVE_BULLETS {
            self.emit(TAU * i as f32 / SHOCKWAVE_BULLETS as f32, speed);
        }
    }

    /// `count` bullets evenly spread over `spread` radians centered on `center`
    fn fan(&mut self, center: f32, count: usize, spread: f32, speed: f32) {
        if count <= 1 {
            self.emit(center, speed);
            return;
        }
        let step = spread / (count - 1) as f32;
        let start = center - spread / 2.0;
        for i in 0..count {
            self.emit(start + step * i as f32, speed);
        }
    }

    fn emit(&mut self, angle: f32, speed: f32) {
        self.bullets.push(Bullet::new(
            self.pos,
            polar_to_cartesian(speed, angle),
            BOSS_BULLET_DAMAGE,
            BulletOwner::Boss,
        ));
    }
}

impl Circle for Boss {
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

    fn boss_at_zero() -> (Boss, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(9);
        let boss = Boss::new(Vec2::new(400.0, 100.0), 0, &mut rng);
        (boss, rng)
    }

    #[test]
    fn test_phase_thresholds() {
        assert_eq!(BossPhase::from_health(30, 30), BossPhase::Full);
        assert_eq!(BossPhase::from_health(20, 30), BossPhase::Full);
        assert_eq!(BossPhase::from_health(19, 30), BossPhase::Wounded);
        assert_eq!(BossPhase::from_health(10, 30), BossPhase::Wounded);
        assert_eq!(BossPhase::from_health(9, 30), BossPhase::Desperate);
        assert_eq!(BossPhase::from_health(0, 30), BossPhase::Desperate);
    }

    #[test]
    fn test_phase_follows_health() {
        let (mut boss, _) = boss_at_zero();
        assert_eq!(boss.phase(), BossPhase::Full);
        for _ in 0..11 {
            boss.take_hit(1);
        }
        assert_eq!(boss.phase(), BossPhase::Wounded);
        for _ in 0..10 {
            boss.take_hit(1);
        }
        assert_eq!(boss.phase(), BossPhase::Desperate);
        assert!(BossPhase::Desperate.shoot_delay_ms() < BossPhase::Full.shoot_delay_ms());
        assert!(BossPhase::Desperate.bullet_speed_scale() > BossPhase::Full.bullet_speed_scale());
    }

    #[test]
    fn test_pattern_pool_grows_in_last_phase() {
        assert_eq!(AttackPattern::pool(BossPhase::Full).len(), 3);
        assert_eq!(AttackPattern::pool(BossPhase::Wounded).len(), 3);
        assert!(AttackPattern::pool(BossPhase::Desperate).contains(&AttackPattern::SpiralVolley));
    }

    #[test]
    fn test_patterns_scale_with_phase() {
        let (mut boss, _) = boss_at_zero();
        let target = Vec2::new(400.0, 600.0);
        boss.fire_pattern(AttackPattern::CircularBurst, target);
        assert_eq!(boss.bullets.len(), 12);
        boss.bullets.clear();
        boss.fire_pattern(AttackPattern::ShotgunSpread, target);
        assert_eq!(boss.bullets.len(), 5);

        boss.health = 5;
        boss.bullets.clear();
        boss.fire_pattern(AttackPattern::CircularBurst, target);
        assert_eq!(boss.bullets.len(), 20);
        boss.bullets.clear();
        boss.fire_pattern(AttackPattern::DirectShot, target);
        assert_eq!(boss.bullets.len(), 3);
        assert!(boss.bullets.iter().all(|b| b.owner == BulletOwner::Boss && b.damage == BOSS_BULLET_DAMAGE));
    }

    #[test]
    fn test_special_charge_cycle() {
        let (mut boss, mut rng) = boss_at_zero();
        let field = Playfield::new(800.0, 600.0);
        let target = Vec2::new(400.0, 550.0);

        assert!(!boss.update(target, 7_999, &field, &mut rng));
        assert!(!boss.is_charging());

        assert!(!boss.update(target, 8_000, &field, &mut rng));
        assert!(boss.is_charging());
        boss.bullets.clear();

        assert!(!boss.update(target, 9_199, &field, &mut rng));
        assert!(boss.is_charging());
        assert!(boss.bullets.is_empty(), "no regular fire while charging");

        assert!(boss.update(target, 9_200, &field, &mut rng));
        assert!(!boss.is_charging());
        assert_eq!(boss.bullets.len(), SHOCKWAVE_BULLETS);
    }

    #[test]
    fn test_regular_fire_respects_delay() {
        let (mut boss, mut rng) = boss_at_zero();
        let field = Playfield::new(800.0, 600.0);
        let target = Vec2::new(400.0, 550.0);
        boss.update(target, 1_999, &field, &mut rng);
        assert!(boss.bullets.is_empty());
        boss.update(target, 2_000, &field, &mut rng);
        assert!(!boss.bullets.is_empty());
    }

    #[test]
    fn test_stays_in_top_band() {
        let (mut boss, mut rng) = boss_at_zero();
        let field = Playfield::new(800.0, 600.0);
        for frame in 0..900u64 {
            let target = Vec2::new((frame as f32 * 3.0) % 800.0, 560.0);
            boss.update(target, frame * 16, &field, &mut rng);
            assert!(boss.pos.y <= field.height * TOP_BAND_FRACTION);
            assert!(boss.pos.x >= boss.radius && boss.pos.x <= field.width - boss.radius);
        }
    }
}
