//! Per-frame collision resolution
//!
//! Runs once after everything has moved. Checks happen in a fixed order:
//!
//! 1. Player bullets against enemies
//! 2. Player bullets against the boss (only bullets that hit no enemy)
//! 3. Hostile bullets and asteroids against the player
//! 4. Health items against the player
//! 5. Power-ups against the player
//!
//! Removals are marked during the scan and applied at the end, so a bullet
//! or hazard resolves at most once per frame.

use rand::Rng;

use super::bullet::BulletOwner;
use super::collision::circles_overlap;
use super::spawn::spawn_health_item;
use super::state::{Effects, GameEvent, Rgb, World};
use crate::consts::*;

/// Tint of the damage flash
const HIT_FLASH: Rgb = Rgb(255, 60, 60);

/// Drop entries whose mask flag is set
fn retain_unmarked<T>(items: &mut Vec<T>, marked: &[bool]) {
    let mut i = 0;
    items.retain(|_| {
        let keep = !marked[i];
        i += 1;
        keep
    });
}

pub fn resolve_collisions(world: &mut World, now_ms: u64) {
    let mut spent = vec![false; world.bullets.len()];
    let mut killed = vec![false; world.enemies.len()];
    let mut boss_killed = false;

    // Player bullets: enemies first, boss only if no enemy matched
    for i in 0..world.bullets.len() {
        if world.bullets[i].owner != BulletOwner::Player {
            continue;
        }

        let bullet = &world.bullets[i];
        let target = world
            .enemies
            .iter()
            .enumerate()
            .position(|(j, e)| !killed[j] && circles_overlap(bullet, e));
        if let Some(j) = target {
            spent[i] = true;
            killed[j] = true;
            destroy_enemy(world, j);
            continue;
        }

        let hits_boss = world
            .boss
            .as_ref()
            .is_some_and(|boss| circles_overlap(&world.bullets[i], boss));
        if hits_boss {
            spent[i] = true;
            boss_killed |= hit_boss(world);
        }
    }

    // A dead boss takes its bullets with it
    if boss_killed {
        for (i, bullet) in world.bullets.iter().enumerate() {
            if bullet.owner == BulletOwner::Boss {
                spent[i] = true;
            }
        }
    }

    for i in 0..world.bullets.len() {
        if spent[i] || !world.bullets[i].owner.is_hostile() {
            continue;
        }
        if circles_overlap(&world.bullets[i], &world.player) {
            spent[i] = true;
            let damage = world.bullets[i].damage;
            hit_player(world, damage);
        }
    }

    let mut rocks = std::mem::take(&mut world.asteroids);
    rocks.retain(|rock| {
        if circles_overlap(rock, &world.player) {
            hit_player(world, rock.damage);
            false
        } else {
            true
        }
    });
    world.asteroids = rocks;

    let mut items = std::mem::take(&mut world.health_items);
    items.retain(|item| {
        if circles_overlap(item, &world.player) {
            world.player.heal(1);
            world.push_event(GameEvent::HealthPickedUp);
            false
        } else {
            true
        }
    });
    world.health_items = items;

    let mut power_ups = std::mem::take(&mut world.power_ups);
    power_ups.retain(|power_up| {
        if circles_overlap(power_up, &world.player) {
            log::debug!("Picked up {}", power_up.kind.label());
            world.player.activate_power_up(power_up.kind, now_ms);
            world.push_event(GameEvent::PowerUpPickedUp(power_up.kind));
            false
        } else {
            true
        }
    });
    world.power_ups = power_ups;

    retain_unmarked(&mut world.bullets, &spent);
    retain_unmarked(&mut world.enemies, &killed);
}

/// Rewards and drops for a destroyed enemy. Removal happens after the scan.
fn destroy_enemy(world: &mut World, index: usize) {
    let pos = world.enemies[index].pos;
    world.score += ENEMY_SCORE;
    world.player.add_credits(ENEMY_CREDITS);
    world.push_event(GameEvent::EnemyDestroyed { pos });
    if world.rng.random_bool(ENEMY_DROP_CHANCE) {
        spawn_health_item(world, Some(pos));
    }
}

/// One player bullet on the boss. Returns true if it killed the boss.
fn hit_boss(world: &mut World) -> bool {
    let Some(boss) = world.boss.as_mut() else {
        return false;
    };
    let destroyed = boss.take_hit(1);
    let (health, pos) = (boss.health, boss.pos);

    world.score += BOSS_HIT_SCORE;
    world.player.add_credits(BOSS_HIT_CREDITS);
    world.push_event(GameEvent::BossHit { health });

    if destroyed {
        world.boss = None;
        world.boss_defeated_current_level = true;
        world.player.add_credits(BOSS_KILL_CREDITS);
        world.push_event(GameEvent::BossDestroyed { pos });
        log::info!("Boss defeated on level {}", world.level);
        if world.rng.random_bool(BOSS_DROP_CHANCE) {
            spawn_health_item(world, Some(pos));
        }
    }
    destroyed
}

fn hit_player(world: &mut World, damage: i32) {
    let was_alive = !world.player.is_dead();
    world.player.take_damage(damage);
    world.effects.start_shake(Effects::HIT_SHAKE_FRAMES);
    world.effects.start_flash(HIT_FLASH);
    world.push_event(GameEvent::PlayerHit { damage });
    if was_alive && world.player.is_dead() {
        log::info!("Player destroyed on level {} with score {}", world.level, world.score);
        world.push_event(GameEvent::PlayerDestroyed);
    }
}
