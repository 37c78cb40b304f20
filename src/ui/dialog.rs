//! Speech bubble dialog
//!
//! Lines queue up and play one at a time: the text types out at a fixed rate,
//! stays up for a moment, then the next queued line starts.

use std::collections::VecDeque;

/// Typing speed
pub const CHARS_PER_SEC: u64 = 40;
/// How long a fully typed line stays up
pub const HOLD_MS: u64 = 2_500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogLine {
    pub speaker: String,
    pub text: String,
}

impl DialogLine {
    pub fn new(speaker: &str, text: &str) -> Self {
        Self {
            speaker: speaker.to_string(),
            text: text.to_string(),
        }
    }

    fn typing_ms(&self) -> u64 {
        self.text.chars().count() as u64 * 1000 / CHARS_PER_SEC
    }
}

/// Mission briefing for the first run
pub fn intro_lines() -> [DialogLine; 2] {
    [
        DialogLine::new("Mission Control", "Pilot, you're our last line of defense."),
        DialogLine::new("Mission Control", "Break through the swarm and stop the Wardens."),
    ]
}

/// Story beat when a level starts
pub fn story_for_level(level: u32) -> Option<DialogLine> {
    let text = match level {
        2 => "Scans are spiking. Expect denser fire from the swarm.",
        4 => "We traced the signal to an asteroid belt. Stay sharp.",
        6 => "Bosses are adapting. Watch for charge-up patterns.",
        _ => return None,
    };
    Some(DialogLine::new("Mission Control", text))
}

/// Taunt when a boss arrives
pub fn boss_taunt(level: u32) -> DialogLine {
    match level {
        5 => DialogLine::new("Warden-01", "You made it this far? Cute. Let's see you dodge this."),
        10 => DialogLine::new("Warden-02", "Your ship is fast. Mine is relentless."),
        15 => DialogLine::new("Warden-03", "Every pulse brings you closer to oblivion."),
        _ => DialogLine::new("Warden", "The abyss answers."),
    }
}

/// The line currently on screen
#[derive(Debug, Clone, Default)]
pub struct DialogBubble {
    line: Option<DialogLine>,
    started_ms: u64,
}

impl DialogBubble {
    pub fn start(&mut self, line: DialogLine, now_ms: u64) {
        self.line = Some(line);
        self.started_ms = now_ms;
    }

    /// Still typing or holding
    pub fn is_active(&self, now_ms: u64) -> bool {
        self.line
            .as_ref()
            .is_some_and(|line| now_ms.saturating_sub(self.started_ms) < line.typing_ms() + HOLD_MS)
    }

    /// Speaker and the portion of text typed so far
    pub fn visible(&self, now_ms: u64) -> Option<(&str, &str)> {
        let line = self.line.as_ref().filter(|_| self.is_active(now_ms))?;
        let elapsed = now_ms.saturating_sub(self.started_ms);
        let chars = (elapsed * CHARS_PER_SEC / 1000) as usize;
        let end = line
            .text
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(line.text.len());
        Some((line.speaker.as_str(), &line.text[..end]))
    }

    pub fn clear(&mut self) {
        self.line = None;
    }
}

/// Pending lines plus the bubble that shows them
#[derive(Debug, Clone, Default)]
pub struct Dialog {
    queue: VecDeque<DialogLine>,
    bubble: DialogBubble,
    intro_shown: bool,
}

impl Dialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: DialogLine) {
        self.queue.push_back(line);
    }

    /// Queue the briefing, once per session
    pub fn enqueue_intro(&mut self) {
        if self.intro_shown {
            return;
        }
        self.intro_shown = true;
        self.queue.extend(intro_lines());
    }

    /// Start the next line once the current one is done
    pub fn update(&mut self, now_ms: u64) {
        if !self.bubble.is_active(now_ms) {
            match self.queue.pop_front() {
                Some(line) => self.bubble.start(line, now_ms),
                None => self.bubble.clear(),
            }
        }
    }

    pub fn visible(&self, now_ms: u64) -> Option<(&str, &str)> {
        self.bubble.visible(now_ms)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drop everything queued or showing (new run)
    pub fn clear(&mut self) {
        self.queue.clear();
        self.bubble.clear();
    }
}
