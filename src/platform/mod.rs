//! Platform abstraction layer
//!
//! Keeps the game free of direct OS dependencies:
//! - Time (wall clock behind a trait, swappable in tests)
//! - Input (raw key state and UI clicks mapped to game commands)

pub mod input;
pub mod time;

pub use input::{KeyState, PartSlot, UiAction};
pub use time::{Clock, ManualClock, SystemClock};
