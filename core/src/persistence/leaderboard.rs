use serde::{Deserialize, Serialize};

use crate::CorruptState;

/// Number of scores kept on the leaderboard.
pub const LEADERBOARD_CAPACITY: usize = 10;

/// Best scores, highest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    scores: Vec<u32>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            scores: Vec::with_capacity(LEADERBOARD_CAPACITY),
        }
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Adds a score and returns its position, or `None` if it does not make the board.
    ///
    /// Positions start at 1. A tie ranks below the scores already on the board.
    pub fn insert(&mut self, score: u32) -> Option<usize> {
        let position = self.scores.partition_point(|&existing| existing >= score);
        if position >= LEADERBOARD_CAPACITY {
            return None;
        }
        self.scores.insert(position, score);
        self.scores.truncate(LEADERBOARD_CAPACITY);
        Some(position + 1)
    }

    pub fn validate(&self) -> Result<(), CorruptState> {
        let descending = self.scores.windows(2).all(|pair| pair[0] >= pair[1]);
        if self.scores.len() > LEADERBOARD_CAPACITY || !descending {
            return Err(CorruptState::Leaderboard(LEADERBOARD_CAPACITY));
        }
        Ok(())
    }
}
