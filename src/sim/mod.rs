//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and replayable:
//! - One seeded RNG owned by the `World`
//! - Time only enters as a `now_ms` argument
//! - No rendering, audio or platform dependencies

pub mod asteroid;
pub mod boss;
pub mod bullet;
pub mod collision;
pub mod enemy;
pub mod pickup;
pub mod player;
pub mod resolve;
pub mod spawn;
pub mod state;
pub mod tick;

pub use asteroid::{Asteroid, AsteroidSize};
pub use boss::{AttackPattern, Boss, BossPhase};
pub use bullet::{Bullet, BulletOwner};
pub use collision::{Circle, circles_overlap, is_collision};
pub use enemy::Enemy;
pub use pickup::{HealthItem, PowerUp, PowerUpKind};
pub use player::{ActivePowerUp, Player, WeaponMode};
pub use resolve::resolve_collisions;
pub use spawn::{spawn_enemies, wave_size};
pub use state::{Effects, GameEvent, Palette, Playfield, Rgb, World};
pub use tick::{TickInput, advance_level, autopilot_input, level_complete, tick};
