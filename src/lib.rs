//! Space Shooter - a wave-based 2D arcade shooter
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (entities, spawning, collisions, ticking)
//! - `game`: Top-level state machine (menu, countdown, playing, game over, ship builder)
//! - `platform`: Clock and input abstraction
//! - `persistence`: Loadout save file and storage helpers
//! - `highscores`: Top-10 score table
//! - `shipyard`: Ship builder catalog and purchases

pub mod audio;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod shipyard;
pub mod sim;
pub mod ui;

pub use game::{Game, GamePhase};
pub use highscores::HighScores;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / SIM_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Default playfield size
    pub const DEFAULT_SCREEN_WIDTH: f32 = 1280.0;
    pub const DEFAULT_SCREEN_HEIGHT: f32 = 720.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const PLAYER_BASE_SPEED: f32 = 5.0;
    /// Extra speed per wing level above 1
    pub const PLAYER_SPEED_PER_WING: f32 = 1.0;
    pub const PLAYER_MAX_HEALTH: i32 = 10;
    /// Distance from the bottom edge the player respawns at
    pub const PLAYER_SPAWN_OFFSET: f32 = 100.0;

    /// Shot cooldowns (ms)
    pub const SHOT_COOLDOWN_MS: u64 = 300;
    pub const RAPID_FIRE_COOLDOWN_MS: u64 = 100;
    pub const SHOTGUN_COOLDOWN_MS: u64 = 500;
    /// Power-up lifetime (ms)
    pub const POWER_UP_DURATION_MS: u64 = 30_000;

    /// Bullets
    pub const BULLET_RADIUS: f32 = 5.0;
    pub const PLAYER_BULLET_SPEED: f32 = 10.0;
    pub const ENEMY_BULLET_SPEED: f32 = 5.0;
    pub const ENEMY_BULLET_DAMAGE: i32 = 1;
    pub const BOSS_BULLET_DAMAGE: i32 = 2;

    /// Enemies
    pub const ENEMY_RADIUS: f32 = 20.0;
    pub const ENEMY_INNER_RADIUS: f32 = 10.0;
    pub const ENEMY_MAX_SPEED: f32 = 2.5;
    /// Inclusive range of frames between enemy shots
    pub const ENEMY_SHOOT_FRAMES_MIN: u32 = 60;
    pub const ENEMY_SHOOT_FRAMES_MAX: u32 = 120;

    /// Boss
    pub const BOSS_RADIUS: f32 = 40.0;
    pub const BOSS_INNER_RADIUS: f32 = 30.0;
    pub const BOSS_MAX_HEALTH: i32 = 30;
    pub const BOSS_SPAWN_Y: f32 = 100.0;
    pub const BOSS_INTERVAL: u32 = 5;
    pub const BOSS_SPECIAL_COOLDOWN_MS: u64 = 8_000;
    pub const BOSS_CHARGE_DURATION_MS: u64 = 1_200;

    /// Asteroids
    pub const ASTEROID_BASE_RADIUS: f32 = 30.0;
    pub const ASTEROID_INNER_RADIUS: f32 = 20.0;
    pub const ASTEROID_DAMAGE: i32 = 2;

    /// Falling items
    pub const ITEM_RADIUS: f32 = 15.0;
    pub const HEALTH_ITEM_SPEED: f32 = 5.0;
    pub const POWER_UP_SPEED: f32 = 3.0;

    /// Per-frame spawn probabilities
    pub const ASTEROID_SPAWN_CHANCE: f64 = 0.002;
    pub const LARGE_ASTEROID_CHANCE: f64 = 0.2;
    pub const HEALTH_SPAWN_CHANCE: f64 = 0.001;
    pub const POWER_UP_SPAWN_CHANCE: f64 = 0.0005;
    pub const ENEMY_DROP_CHANCE: f64 = 0.05;
    pub const BOSS_DROP_CHANCE: f64 = 0.1;

    /// Wave spawning
    pub const INITIAL_WAVE_SIZE: usize = 3;
    pub const SPAWN_MAX_ATTEMPTS: u32 = 500;

    /// Rewards
    pub const ENEMY_SCORE: u64 = 1;
    pub const ENEMY_CREDITS: u32 = 1;
    pub const BOSS_HIT_SCORE: u64 = 5;
    pub const BOSS_HIT_CREDITS: u32 = 5;
    pub const BOSS_KILL_CREDITS: u32 = 15;
    pub const LEVEL_CLEAR_SCORE: u64 = 10;

    /// Countdown
    pub const COUNTDOWN_FROM: i64 = 3;
    pub const COUNTDOWN_STEP_MS: u64 = 1_000;

    /// Upgrades
    pub const MAX_UPGRADE_LEVEL: u8 = 3;
    pub const WEAPON_UPGRADE_COST: u32 = 6;
    pub const WING_UPGRADE_COST: u32 = 5;
}

/// Unit vector at `angle` radians scaled to `len`
#[inline]
pub fn polar_to_cartesian(len: f32, angle: f32) -> Vec2 {
    Vec2::new(len * angle.cos(), len * angle.sin())
}
