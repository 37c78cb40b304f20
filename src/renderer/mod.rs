//! Rendering interface
//!
//! Renderers are read-only consumers: each frame they get a [`FrameView`]
//! borrowing the world and presentation state, and draw however they like.

pub mod text;

pub use text::TextRenderer;

use glam::Vec2;

use crate::game::GamePhase;
use crate::sim::{Effects, Rgb, World};
use crate::ui::Hud;

/// Everything a renderer may look at for one frame
#[derive(Debug)]
pub struct FrameView<'a> {
    pub phase: GamePhase,
    pub world: &'a World,
    pub hud: Hud,
    /// Text for the countdown overlay ("3", "2", "1", "Go!")
    pub countdown: Option<&'static str>,
    /// Speaker and typed text of the dialog bubble
    pub dialog: Option<(&'a str, &'a str)>,
    pub ship_tint: Rgb,
    /// Camera offset from screen shake
    pub shake: Vec2,
    /// Flash overlay color and opacity
    pub flash: Option<(Rgb, f32)>,
}

pub trait Renderer {
    fn draw(&mut self, frame: &FrameView<'_>);
}

/// Camera jitter for the current shake, zero once it has decayed
pub fn shake_offset(effects: &Effects, frame: u64) -> Vec2 {
    if effects.shake_frames == 0 {
        return Vec2::ZERO;
    }
    let strength = effects.shake_frames.min(Effects::SPECIAL_SHAKE_FRAMES) as f32 * 0.5;
    let t = frame as f32;
    Vec2::new((t * 12.9898).sin(), (t * 78.233).cos()) * strength
}

/// Flash overlay, if one is running
pub fn flash_overlay(effects: &Effects) -> Option<(Rgb, f32)> {
    (effects.flash_frames > 0).then(|| (effects.flash_color, effects.flash_alpha()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_overlays() {
        let mut fx = Effects::default();
        assert_eq!(shake_offset(&fx, 10), Vec2::ZERO);
        assert_eq!(flash_overlay(&fx), None);

        fx.start_shake(Effects::HIT_SHAKE_FRAMES);
        fx.start_flash(Rgb(255, 0, 0));
        let offset = shake_offset(&fx, 10);
        assert!(offset.length() <= Effects::HIT_SHAKE_FRAMES as f32 * 0.5 * 2f32.sqrt());
        assert_eq!(flash_overlay(&fx), Some((Rgb(255, 0, 0), 1.0)));
    }
}
