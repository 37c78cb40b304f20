//! Fixed timestep simulation tick
//!
//! Advances one playing frame: input, movement, spawning, shooting, bullet
//! ingest, collision resolution and level progression, in that order.

use glam::Vec2;

use super::collision::Circle;
use super::player::WeaponMode;
use super::resolve::resolve_collisions;
use super::spawn::{maybe_spawn_hazards, should_spawn_boss, spawn_boss, spawn_enemies, wave_size};
use super::state::{Effects, GameEvent, Palette, Rgb, World};
use crate::consts::*;

/// Flash tint for the boss shockwave
const SPECIAL_FLASH: Rgb = Rgb(255, 255, 255);
/// Hostile bullets closer than this (vertically) are dodged by the autopilot
const AUTOPILOT_THREAT_RANGE: f32 = 160.0;
const AUTOPILOT_DEADZONE: f32 = 4.0;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Horizontal intent: -1 left, 1 right
    pub move_x: i8,
    /// Vertical intent: -1 up, 1 down
    pub move_y: i8,
    /// Fire held
    pub fire: bool,
    /// Switch weapon mode this frame
    pub weapon_mode: Option<WeaponMode>,
    /// Demo mode - the simulation flies the ship
    pub autopilot: bool,
}

/// Input the autopilot would give for the current frame
///
/// Sidesteps the nearest hostile bullet heading for the ship, otherwise lines
/// up under the closest target (enemy, then boss, then a falling pickup).
pub fn autopilot_input(world: &World) -> TickInput {
    let player = &world.player;
    let pos = player.pos;

    let threat = world
        .bullets
        .iter()
        .filter(|b| b.owner.is_hostile() && b.vel.y > 0.0)
        .filter(|b| b.pos.y < pos.y && pos.y - b.pos.y < AUTOPILOT_THREAT_RANGE)
        .filter(|b| (b.pos.x - pos.x).abs() < player.radius * 2.0)
        .min_by(|a, b| a.pos.distance(pos).total_cmp(&b.pos.distance(pos)));

    let move_x = if let Some(bullet) = threat {
        let away = pos.x - bullet.pos.x;
        let dir = if away.abs() < f32::EPSILON { 1 } else { away.signum() as i8 };
        // Pinned against a wall: dodge the other way
        if (dir < 0 && pos.x <= player.radius + 1.0) || (dir > 0 && pos.x >= world.field.width - player.radius - 1.0) {
            -dir
        } else {
            dir
        }
    } else {
        let target = world
            .enemies
            .iter()
            .map(|e| e.pos)
            .min_by(|a, b| (a.x - pos.x).abs().total_cmp(&(b.x - pos.x).abs()))
            .or_else(|| world.boss.as_ref().map(|b| b.center()))
            .or_else(|| {
                world
                    .health_items
                    .iter()
                    .map(|h| h.pos)
                    .chain(world.power_ups.iter().map(|p| p.pos))
                    .min_by(|a, b| a.distance(pos).total_cmp(&b.distance(pos)))
            });
        match target {
            Some(t) if t.x > pos.x + AUTOPILOT_DEADZONE => 1,
            Some(t) if t.x < pos.x - AUTOPILOT_DEADZONE => -1,
            _ => 0,
        }
    };

    TickInput {
        move_x,
        move_y: 0,
        fire: true,
        weapon_mode: None,
        autopilot: true,
    }
}

/// Advance the world by one frame
///
/// `now_ms` comes from the game's clock and drives every time-based rule
/// (shot cooldowns, power-up expiry, boss specials).
pub fn tick(world: &mut World, input: &TickInput, now_ms: u64) {
    let input = if input.autopilot {
        autopilot_input(world)
    } else {
        input.clone()
    };
    let field = world.field;

    // Player
    if let Some(mode) = input.weapon_mode {
        world.player.set_weapon_mode(mode);
    }
    world.player.set_intent(input.move_x, input.move_y);
    world.player.update_position(&field);
    if input.fire && world.player.shoot(now_ms) {
        world.push_event(GameEvent::ShotFired);
    }
    if world.player.update_power_up(now_ms) {
        log::debug!("Power-up expired at {}ms", now_ms);
        world.push_event(GameEvent::PowerUpExpired);
    }

    // Spawning
    maybe_spawn_hazards(world);
    if should_spawn_boss(world) {
        spawn_boss(world, now_ms);
    }

    // Enemies steer against a snapshot of where everyone was this frame
    let player_pos = world.player.pos;
    let snapshot: Vec<Vec2> = world.enemies.iter().map(|e| e.pos).collect();
    for enemy in &mut world.enemies {
        enemy.steer(player_pos, &snapshot, &field, &mut world.rng);
        enemy.advance();
        enemy.update_shooting(player_pos, &mut world.rng);
    }
    world.enemies.retain(|e| !e.is_below(&field));

    let mut special_at = None;
    if let Some(boss) = world.boss.as_mut() {
        if boss.update(player_pos, now_ms, &field, &mut world.rng) {
            special_at = Some(boss.pos);
        }
    }
    if let Some(pos) = special_at {
        world.effects.start_shake(Effects::SPECIAL_SHAKE_FRAMES);
        world.effects.start_flash(SPECIAL_FLASH);
        world.push_event(GameEvent::BossSpecial { pos });
    }

    // Bullets
    world.ingest_bullets();
    for bullet in &mut world.bullets {
        bullet.advance();
    }
    world.bullets.retain(|b| !b.is_off_screen(&field));

    // Hazards and pickups
    world.asteroids.retain_mut(|rock| {
        rock.rotate();
        rock.advance(&field)
    });
    for item in &mut world.health_items {
        item.advance();
    }
    world.health_items.retain(|h| !h.is_below(&field));
    for power_up in &mut world.power_ups {
        power_up.advance();
    }
    world.power_ups.retain(|p| !p.is_below(&field));

    resolve_collisions(world, now_ms);

    world.effects.decay();
    world.frame += 1;

    // A destroyed player ends the run, not the level
    if !world.player.is_dead() && level_complete(world) {
        advance_level(world);
    }
}

/// A level is cleared when the wave is gone and no boss remains
pub fn level_complete(world: &World) -> bool {
    world.enemies.is_empty() && !world.boss_active()
}

pub fn advance_level(world: &mut World) {
    world.level += 1;
    world.score += LEVEL_CLEAR_SCORE;
    world.boss_defeated_current_level = false;
    world.palette = Palette::random(&mut world.rng);
    let placed = spawn_enemies(world, wave_size(world.level));
    log::info!("Level {} started with {} enemies", world.level, placed);
    world.push_event(GameEvent::LevelUp { level: world.level });
}
