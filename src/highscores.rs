//! High score leaderboard system
//!
//! Persisted as plain text, one `score,level,time_seconds` record per line,
//! top 10 by score (ties go to the faster run).

use std::cmp::Ordering;
use std::fmt::Write as _;
use std::path::Path;

use crate::persistence::{PersistError, read_optional, write_atomic};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Run length in seconds
    pub time_secs: f64,
}

impl HighScoreEntry {
    /// Leaderboard order: higher score first, then shorter time
    fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then(self.time_secs.total_cmp(&other.time_secs))
    }

    fn parse_line(line: &str, line_no: usize) -> Result<Self, PersistError> {
        let bad = |reason: &str| PersistError::Parse {
            line: line_no,
            reason: reason.to_string(),
        };
        let mut parts = line.trim().split(',');
        let (Some(score), Some(level), Some(time), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(bad("expected 3 fields"));
        };
        let score = score.trim().parse().map_err(|_| bad("score is not a number"))?;
        let level = level.trim().parse().map_err(|_| bad("level is not a number"))?;
        let time_secs: f64 = time.trim().parse().map_err(|_| bad("time is not a number"))?;
        if !time_secs.is_finite() {
            return Err(bad("time is not finite"));
        }
        Ok(Self {
            score,
            level,
            time_secs,
        })
    }
}

/// High score leaderboard
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a score file, skipping lines that don't parse
    pub fn parse(text: &str) -> Self {
        let mut entries: Vec<HighScoreEntry> = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(i, line)| match HighScoreEntry::parse_line(line, i + 1) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Skipping score record: {}", e);
                    None
                }
            })
            .collect();
        entries.sort_by(HighScoreEntry::rank_cmp);
        entries.truncate(MAX_HIGH_SCORES);
        Self { entries }
    }

    /// Serialize in file format
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for e in &self.entries {
            let _ = writeln!(out, "{},{},{}", e.score, e.level, e.time_secs);
        }
        out
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64, time_secs: f64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        let candidate = HighScoreEntry {
            score,
            level: 0,
            time_secs,
        };
        self.entries
            .last()
            .map(|last| candidate.rank_cmp(last) == Ordering::Less)
            .unwrap_or(true)
    }

    /// Add a run to the leaderboard
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u64, level: u32, time_secs: f64) -> Option<usize> {
        if !self.qualifies(score, time_secs) {
            return None;
        }
        let entry = HighScoreEntry {
            score,
            level,
            time_secs,
        };

        // Ties with an existing entry rank after it
        let pos = self
            .entries
            .iter()
            .position(|e| entry.rank_cmp(e) == Ordering::Less)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(pos + 1)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from disk; a missing or unreadable file gives an empty table
    pub fn load(path: &Path) -> Self {
        match read_optional(path) {
            Ok(Some(text)) => {
                let scores = Self::parse(&text);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("{}; starting with empty high scores", e);
                Self::new()
            }
        }
    }

    /// Rewrite the whole file
    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        write_atomic(path, &self.to_text())?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_by_score_then_time() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(50, 3, 90.0), Some(1));
        assert_eq!(scores.add_score(80, 4, 120.0), Some(1));
        assert_eq!(scores.add_score(50, 3, 60.5), Some(2));
        assert_eq!(scores.add_score(50, 2, 75.0), Some(3));

        let order: Vec<(u64, f64)> = scores.entries.iter().map(|e| (e.score, e.time_secs)).collect();
        assert_eq!(order, vec![(80, 120.0), (50, 60.5), (50, 75.0), (50, 90.0)]);
        assert_eq!(scores.top_score(), Some(80));
    }

    #[test]
    fn test_keeps_top_ten() {
        let mut scores = HighScores::new();
        for i in 1..=10 {
            scores.add_score(i * 10, 1, 30.0);
        }
        assert!(!scores.qualifies(5, 1.0));
        assert_eq!(scores.add_score(5, 1, 1.0), None);
        // Same score as the last entry but faster
        assert_eq!(scores.add_score(10, 1, 10.0), Some(10));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries[9].time_secs, 10.0);
        assert_eq!(scores.add_score(1000, 9, 500.0), Some(1));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
    }

    #[test]
    fn test_parse_skips_bad_lines() {
        let text = "30,2,45.5\ngarbage\n-4,1,2.0\n\n12,1,abc\n70,5,300.25\n1,2,3,4\n";
        let scores = HighScores::parse(text);
        assert_eq!(scores.entries.len(), 2);
        assert_eq!(scores.entries[0].score, 70);
        assert_eq!(scores.entries[1].level, 2);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.txt");
        assert!(HighScores::load(&path).is_empty());

        let mut scores = HighScores::new();
        scores.add_score(25, 2, 61.25);
        scores.add_score(40, 3, 99.0);
        scores.save(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "40,3,99\n25,2,61.25\n");
        assert_eq!(HighScores::load(&path), scores);
    }
}
