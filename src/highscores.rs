//! High score leaderboard
//!
//! Top 3 scores, persisted as three separate integer slots.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::persistence::Storage;

/// Number of high scores kept
pub const MAX_HIGH_SCORES: usize = 3;

/// Storage keys, best first
const STORAGE_KEYS: [&str; MAX_HIGH_SCORES] = ["highScoreOne", "highScoreTwo", "highScoreThree"];

/// High score leaderboard, sorted descending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScores {
    pub scores: [u64; MAX_HIGH_SCORES],
}

impl HighScores {
    /// Create an all-zero leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from arbitrary scores (sorted, best three kept)
    pub fn from_scores(scores: &[u64]) -> Self {
        let mut sorted = scores.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        let mut table = Self::new();
        for (slot, score) in table.scores.iter_mut().zip(sorted) {
            *slot = score;
        }
        table
    }

    /// Lowest score on the board
    pub fn lowest(&self) -> u64 {
        self.scores[MAX_HIGH_SCORES - 1]
    }

    /// Check if a score beats the lowest entry
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.lowest()
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        self.scores.iter().position(|&s| score > s).map(|i| i + 1)
    }

    /// Insert a score if it qualifies; the previous lowest drops off.
    /// Returns the rank achieved (1-indexed).
    pub fn add_score(&mut self, score: u64) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        let i = rank - 1;
        self.scores.copy_within(i..MAX_HIGH_SCORES - 1, i + 1);
        self.scores[i] = score;
        Some(rank)
    }

    /// Get the top score
    pub fn top_score(&self) -> u64 {
        self.scores[0]
    }

    /// Load from storage. All three slots must be present and numeric,
    /// otherwise the board starts from zeroes.
    pub fn load(storage: &dyn Storage) -> Self {
        let mut scores = [0u64; MAX_HIGH_SCORES];
        for (slot, key) in scores.iter_mut().zip(STORAGE_KEYS) {
            match storage.get(key).and_then(|v| v.trim().parse::<u64>().ok()) {
                Some(score) => *slot = score,
                None => {
                    log::info!("No high scores found, starting fresh");
                    return Self::new();
                }
            }
        }
        log::info!("Loaded high scores {:?}", scores);
        Self::from_scores(&scores)
    }

    /// Write all three slots
    pub fn save(&self, storage: &mut dyn Storage) -> Result<()> {
        for (score, key) in self.scores.iter().zip(STORAGE_KEYS) {
            storage.set(key, &score.to_string())?;
        }
        log::info!("High scores saved {:?}", self.scores);
        Ok(())
    }
}
