//! In-process episode leaderboard
//!
//! Lives as long as the driver that owns it and is never written to disk.
//! Keeps the top 10 episodes by score.

use serde::{Deserialize, Serialize};

/// Maximum number of episodes to keep
pub const MAX_ENTRIES: usize = 10;

/// One finished episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub episode: u32,
    /// Pipes passed
    pub score: u32,
    /// Ticks survived
    pub ticks: u64,
    /// Sum of per-tick rewards, crash penalty included
    pub total_reward: f32,
}

/// Episode leaderboard, sorted by score (descending)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Scoreboard {
    pub entries: Vec<EpisodeRecord>,
    /// Episodes recorded, including ones that didn't place
    pub episodes_played: u32,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: u32) -> bool {
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Record an episode.
    /// Returns the rank achieved (1-indexed) or None if it didn't place.
    pub fn record(&mut self, record: EpisodeRecord) -> Option<usize> {
        self.episodes_played += 1;
        if !self.qualifies(record.score) {
            return None;
        }

        // Ties keep the earlier episode ahead
        let pos = self.entries.iter().position(|e| record.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, record);
                i + 1
            }
            None => {
                self.entries.push(record);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_ENTRIES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Mean score over the episodes still on the board
    pub fn mean_score(&self) -> Option<f32> {
        if self.entries.is_empty() {
            return None;
        }
        let sum: u32 = self.entries.iter().map(|e| e.score).sum();
        Some(sum as f32 / self.entries.len() as f32)
    }

    /// Human-readable table
    pub fn summary(&self) -> String {
        let mut out = format!("Episodes played: {}\n", self.episodes_played);
        for (i, e) in self.entries.iter().enumerate() {
            out.push_str(&format!(
                "{:>2}. episode {:<4} score {:<4} ticks {:<6} reward {:.1}\n",
                i + 1,
                e.episode,
                e.score,
                e.ticks,
                e.total_reward
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(episode: u32, score: u32) -> EpisodeRecord {
        EpisodeRecord {
            episode,
            score,
            ticks: 100 + score as u64,
            total_reward: score as f32,
        }
    }

    #[test]
    fn test_ranking() {
        let mut board = Scoreboard::new();
        assert!(board.is_empty());
        assert_eq!(board.record(rec(1, 2)), Some(1));
        assert_eq!(board.record(rec(2, 5)), Some(1));
        assert_eq!(board.record(rec(3, 2)), Some(3));
        assert_eq!(board.top_score(), Some(5));
        let order: Vec<u32> = board.entries.iter().map(|e| e.episode).collect();
        assert_eq!(order, vec![2, 1, 3]);
    }

    #[test]
    fn test_board_is_capped() {
        let mut board = Scoreboard::new();
        for i in 0..MAX_ENTRIES as u32 {
            board.record(rec(i, 10 + i));
        }
        assert!(!board.qualifies(10));
        assert_eq!(board.record(rec(99, 3)), None);
        assert_eq!(board.record(rec(100, 15)), Some(6));
        assert_eq!(board.entries.len(), MAX_ENTRIES);
        assert_eq!(board.entries.last().map(|e| e.score), Some(11));
        assert_eq!(board.episodes_played, MAX_ENTRIES as u32 + 2);
    }

    #[test]
    fn test_mean_and_summary() {
        let mut board = Scoreboard::new();
        assert_eq!(board.mean_score(), None);
        board.record(rec(1, 1));
        board.record(rec(2, 3));
        assert_eq!(board.mean_score(), Some(2.0));
        let text = board.summary();
        assert!(text.starts_with("Episodes played: 2\n"));
        assert_eq!(text.lines().count(), 3);
    }
}
