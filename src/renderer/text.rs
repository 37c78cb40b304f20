//! Text renderer for headless runs
//!
//! Logs phase changes and countdown steps as they happen, and a HUD line
//! every few frames while playing.

use super::{FrameView, Renderer};
use crate::game::GamePhase;

#[derive(Debug)]
pub struct TextRenderer {
    /// Log the HUD every this many playing frames
    every: u64,
    frames: u64,
    last_phase: Option<GamePhase>,
    last_countdown: Option<&'static str>,
    /// Lines written so far
    lines: Vec<String>,
}

impl TextRenderer {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            frames: 0,
            last_phase: None,
            last_countdown: None,
            lines: Vec::new(),
        }
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn emit(&mut self, line: String) {
        log::info!("{}", line);
        self.lines.push(line);
    }
}

impl Renderer for TextRenderer {
    fn draw(&mut self, frame: &FrameView<'_>) {
        if self.last_phase != Some(frame.phase) {
            self.last_phase = Some(frame.phase);
            self.emit(format!("== {:?} ==", frame.phase));
        }
        if frame.countdown != self.last_countdown {
            self.last_countdown = frame.countdown;
            if let Some(text) = frame.countdown {
                self.emit(text.to_string());
            }
        }

        if frame.phase == GamePhase::Playing {
            if self.frames % self.every == 0 {
                let mut line = format!(
                    "{} | {} enemies, {} bullets, {} asteroids",
                    frame.hud,
                    frame.world.enemies.len(),
                    frame.world.bullets.len(),
                    frame.world.asteroids.len()
                );
                if let Some((speaker, text)) = frame.dialog {
                    line.push_str(&format!(" | {}: \"{}\"", speaker, text));
                }
                self.emit(line);
            }
            self.frames += 1;
        }
    }
}
