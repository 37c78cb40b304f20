//! World state and core simulation types
//!
//! Everything a run mutates lives in [`World`]; there is no global state, so
//! independent worlds can be created side by side (tests do this a lot).

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::asteroid::Asteroid;
use super::boss::Boss;
use super::bullet::{Bullet, BulletOwner};
use super::enemy::Enemy;
use super::pickup::{HealthItem, PowerUp, PowerUpKind};
use super::player::Player;
use crate::consts::*;

/// Playfield dimensions (origin top-left, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new(DEFAULT_SCREEN_WIDTH, DEFAULT_SCREEN_HEIGHT)
    }
}

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn inverted(self) -> Self {
        Rgb(255 - self.0, 255 - self.1, 255 - self.2)
    }
}

/// Per-level color scheme handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    /// Enemy hulls and default player tint (inverse of background)
    pub foreground: Rgb,
}

impl Palette {
    /// Random dark background, never pure black
    pub fn random(rng: &mut impl Rng) -> Self {
        let background = loop {
            let c = Rgb(
                rng.random_range(0..=100),
                rng.random_range(0..=100),
                rng.random_range(0..=100),
            );
            if c != Rgb(0, 0, 0) {
                break c;
            }
        };
        Self {
            background,
            foreground: background.inverted(),
        }
    }
}

/// Screen shake and flash feedback, counted in frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Effects {
    pub shake_frames: u32,
    pub flash_frames: u32,
    pub flash_color: Rgb,
}

impl Effects {
    pub const HIT_SHAKE_FRAMES: u32 = 15;
    pub const SPECIAL_SHAKE_FRAMES: u32 = 20;
    pub const FLASH_FRAMES: u32 = 10;

    pub fn start_shake(&mut self, frames: u32) {
        self.shake_frames = self.shake_frames.max(frames);
    }

    pub fn start_flash(&mut self, color: Rgb) {
        self.flash_frames = Self::FLASH_FRAMES;
        self.flash_color = color;
    }

    /// Flash opacity in [0, 1]
    pub fn flash_alpha(&self) -> f32 {
        self.flash_frames as f32 / Self::FLASH_FRAMES as f32
    }

    pub fn decay(&mut self) {
        self.shake_frames = self.shake_frames.saturating_sub(1);
        self.flash_frames = self.flash_frames.saturating_sub(1);
    }
}

/// Discrete things that happened during a frame, for audio/UI collaborators
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    ShotFired,
    EnemyDestroyed { pos: Vec2 },
    BossSpawned { level: u32 },
    BossHit { health: i32 },
    BossDestroyed { pos: Vec2 },
    BossSpecial { pos: Vec2 },
    PlayerHit { damage: i32 },
    PlayerDestroyed,
    HealthPickedUp,
    PowerUpPickedUp(PowerUpKind),
    PowerUpExpired,
    LevelUp { level: u32 },
    CountdownTick(i64),
    CountdownGo,
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct World {
    pub field: Playfield,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Current level (1-based)
    pub level: u32,
    pub score: u64,
    pub boss_interval: u32,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub boss: Option<Boss>,
    pub boss_defeated_current_level: bool,
    pub asteroids: Vec<Asteroid>,
    pub health_items: Vec<HealthItem>,
    pub power_ups: Vec<PowerUp>,
    /// Shared pool of in-flight bullets, filled by the per-frame ingest
    pub bullets: Vec<Bullet>,
    pub effects: Effects,
    pub palette: Palette,
    /// Simulation frame counter
    pub frame: u64,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
}

impl World {
    /// Create an empty world with the given seed
    pub fn new(field: Playfield, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let palette = Palette::random(&mut rng);
        Self {
            field,
            seed,
            rng,
            level: 1,
            score: 0,
            boss_interval: BOSS_INTERVAL,
            player: Player::new(&field),
            enemies: Vec::new(),
            boss: None,
            boss_defeated_current_level: false,
            asteroids: Vec::new(),
            health_items: Vec::new(),
            power_ups: Vec::new(),
            bullets: Vec::new(),
            effects: Effects::default(),
            palette,
            frame: 0,
            events: Vec::new(),
        }
    }

    /// Clear all run-scoped state for a fresh run. Player progression survives.
    pub fn reset_run(&mut self) {
        self.level = 1;
        self.score = 0;
        self.player.reset(&self.field);
        self.enemies.clear();
        self.boss = None;
        self.boss_defeated_current_level = false;
        self.asteroids.clear();
        self.health_items.clear();
        self.power_ups.clear();
        self.bullets.clear();
        self.effects = Effects::default();
        self.palette = Palette::random(&mut self.rng);
        self.frame = 0;
        self.events.clear();
    }

    pub fn boss_active(&self) -> bool {
        self.boss.is_some()
    }

    /// Move every shooter's freshly fired bullets into the shared pool
    pub fn ingest_bullets(&mut self) {
        self.bullets.append(&mut self.player.bullets);
        for enemy in &mut self.enemies {
            self.bullets.append(&mut enemy.bullets);
        }
        if let Some(boss) = &mut self.boss {
            self.bullets.append(&mut boss.bullets);
        }
    }

    /// Bullets in the shared pool fired by `owner`
    pub fn bullets_from(&self, owner: BulletOwner) -> impl Iterator<Item = &Bullet> {
        self.bullets.iter().filter(move |b| b.owner == owner)
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events raised so far
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_dark_and_inverted() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let p = Palette::random(&mut rng);
            assert_ne!(p.background, Rgb(0, 0, 0));
            assert!(p.background.0 <= 100 && p.background.1 <= 100 && p.background.2 <= 100);
            assert_eq!(p.foreground, p.background.inverted());
        }
    }

    #[test]
    fn test_effects_decay() {
        let mut fx = Effects::default();
        fx.start_shake(Effects::HIT_SHAKE_FRAMES);
        fx.start_flash(Rgb(255, 255, 255));
        assert_eq!(fx.flash_alpha(), 1.0);
        for _ in 0..Effects::FLASH_FRAMES {
            fx.decay();
        }
        assert_eq!(fx.flash_frames, 0);
        assert_eq!(fx.shake_frames, 5);
    }

    #[test]
    fn test_ingest_drains_shooters() {
        let mut world = World::new(Playfield::default(), 1);
        assert!(world.player.shoot(0));
        world.enemies.push(Enemy::new(Vec2::new(100.0, 100.0), 60));
        world.enemies[0].shoot_at(world.player.pos);
        world.ingest_bullets();
        assert!(world.player.bullets.is_empty());
        assert!(world.enemies[0].bullets.is_empty());
        assert_eq!(world.bullets_from(BulletOwner::Player).count(), 1);
        assert_eq!(world.bullets_from(BulletOwner::Enemy).count(), 1);
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = World::new(Playfield::default(), 42);
        let b = World::new(Playfield::default(), 42);
        assert_eq!(a.palette, b.palette);
    }
}
