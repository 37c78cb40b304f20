//! Procedural spawning of waves, hazards, pickups and bosses

use std::ops::RangeInclusive;

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::asteroid::{Asteroid, AsteroidSize};
use super::boss::Boss;
use super::collision::is_collision;
use super::enemy::Enemy;
use super::pickup::{HealthItem, PowerUp, PowerUpKind};
use super::state::{GameEvent, World};
use crate::consts::*;

/// Horizontal margin for enemy placement
const ENEMY_SPAWN_MARGIN: f32 = 20.0;
/// Vertical band enemies are placed in
const ENEMY_SPAWN_Y: RangeInclusive<f32> = 50.0..=150.0;
const ASTEROID_SPAWN_MARGIN: f32 = 50.0;

/// Inclusive range that never inverts on a tiny playfield
fn span(lo: f32, hi: f32) -> RangeInclusive<f32> {
    lo..=hi.max(lo)
}

/// Number of enemies in the wave for `level`
pub fn wave_size(level: u32) -> usize {
    INITIAL_WAVE_SIZE + level.saturating_sub(1) as usize * 2
}

/// Place up to `count` enemies without overlapping existing ones
///
/// Placement uses rejection sampling with a bounded number of attempts, so
/// a crowded playfield may receive fewer enemies. Returns how many were placed.
pub fn spawn_enemies(world: &mut World, count: usize) -> usize {
    let xs = span(ENEMY_SPAWN_MARGIN, world.field.width - ENEMY_SPAWN_MARGIN);
    let mut placed = 0;
    let mut attempts = 0;

    while placed < count && attempts < SPAWN_MAX_ATTEMPTS {
        attempts += 1;
        let pos = Vec2::new(
            world.rng.random_range(xs.clone()),
            world.rng.random_range(ENEMY_SPAWN_Y),
        );
        let overlaps = world
            .enemies
            .iter()
            .any(|e| is_collision(pos, e.pos, ENEMY_RADIUS, e.radius));
        if overlaps {
            continue;
        }
        let timer = world
            .rng
            .random_range(ENEMY_SHOOT_FRAMES_MIN..=ENEMY_SHOOT_FRAMES_MAX);
        world.enemies.push(Enemy::new(pos, timer));
        placed += 1;
    }

    if placed < count {
        log::debug!("Placed {}/{} enemies after {} attempts", placed, count, attempts);
    }
    placed
}

/// Per-frame random hazards and pickups
pub fn maybe_spawn_hazards(world: &mut World) {
    if world.rng.random_bool(ASTEROID_SPAWN_CHANCE) {
        spawn_asteroid(world);
    }
    if world.rng.random_bool(HEALTH_SPAWN_CHANCE) {
        spawn_health_item(world, None);
    }
    if world.rng.random_bool(POWER_UP_SPAWN_CHANCE) {
        spawn_power_up(world, None);
    }
}

/// Spawn an asteroid just above the top edge
pub fn spawn_asteroid(world: &mut World) {
    let size = if world.rng.random_bool(LARGE_ASTEROID_CHANCE) {
        AsteroidSize::Large
    } else {
        AsteroidSize::Small
    };
    let x = world
        .rng
        .random_range(span(ASTEROID_SPAWN_MARGIN, world.field.width - ASTEROID_SPAWN_MARGIN));
    let y = -ASTEROID_BASE_RADIUS * size.multiplier();
    let asteroid = Asteroid::new(Vec2::new(x, y), size, &mut world.rng);
    log::debug!("Asteroid ({:?}) spawned at x={:.0}", size, x);
    world.asteroids.push(asteroid);
}

/// Random point just above the top edge for a falling item
fn item_drop_point(world: &mut World) -> Vec2 {
    let x = world
        .rng
        .random_range(span(ITEM_RADIUS, world.field.width - ITEM_RADIUS));
    Vec2::new(x, -ITEM_RADIUS)
}

/// Spawn a health item at `at`, or at a random point above the playfield
pub fn spawn_health_item(world: &mut World, at: Option<Vec2>) {
    let pos = match at {
        Some(p) => p,
        None => item_drop_point(world),
    };
    let hue = world.rng.random::<f32>();
    world.health_items.push(HealthItem::new(pos, hue));
}

/// Spawn a random power-up at `at`, or at a random point above the playfield
pub fn spawn_power_up(world: &mut World, at: Option<Vec2>) {
    let pos = match at {
        Some(p) => p,
        None => item_drop_point(world),
    };
    let kind = PowerUpKind::ALL
        .choose(&mut world.rng)
        .copied()
        .unwrap_or(PowerUpKind::RapidFire);
    log::debug!("{} power-up spawned", kind.label());
    world.power_ups.push(PowerUp::new(pos, kind));
}

/// Boss levels get one boss, which stays beaten once defeated
pub fn should_spawn_boss(world: &World) -> bool {
    world.boss_interval > 0
        && world.level % world.boss_interval == 0
        && !world.boss_active()
        && !world.boss_defeated_current_level
}

pub fn spawn_boss(world: &mut World, now_ms: u64) {
    let pos = Vec2::new(world.field.width / 2.0, BOSS_SPAWN_Y);
    world.boss = Some(Boss::new(pos, now_ms, &mut world.rng));
    log::info!("Boss spawned on level {}", world.level);
    world.push_event(GameEvent::BossSpawned { level: world.level });
}
