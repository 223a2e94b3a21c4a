use thiserror::Error;

use crate::{CellType, SessionState};

/// Board configuration rejected before generation.
#[derive(Error, Debug, Copy, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Board dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("Monster frequency must be within [0, 1], got {0}")]
    InvalidFrequency(f64),
    #[error("Type distribution must sum to 1, got {0}")]
    DistributionSum(f64),
    #[error("Negative weight for {0:?}")]
    NegativeWeight(CellType),
    #[error("Boss cannot be part of a type distribution")]
    BossInDistribution,
    #[error("Empty cannot be part of a type distribution")]
    EmptyInDistribution,
}

/// Why a persisted record was refused.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorruptState {
    #[error("Board grid is empty or not rectangular")]
    BoardShape,
    #[error("Cell at {0:?} has a value that does not match its neighbors")]
    CellValue((usize, usize)),
    #[error("Cell at {0:?} is both revealed and flagged")]
    FlaggedReveal((usize, usize)),
    #[error("Expected exactly one boss, found {0}")]
    BossCount(usize),
    #[error("Boss is already revealed")]
    BossRevealed,
    #[error("Player field out of range: {0}")]
    PlayerRange(&'static str),
    #[error("Level {level} does not match {experience} experience")]
    LevelMismatch { level: u8, experience: u32 },
    #[error("Class state does not belong to {0}")]
    ClassState(String),
    #[error("Leaderboard is not a descending list of at most {0} scores")]
    Leaderboard(usize),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Cannot {action} while {from:?}")]
    InvalidTransition {
        from: SessionState,
        action: &'static str,
    },
    #[error("No game in progress")]
    NoActiveGame,
    #[error("Special ability is not available")]
    AbilityUnavailable,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Corrupt game state: {0}")]
    Corrupt(#[from] CorruptState),
}

pub type Result<T> = core::result::Result<T, GameError>;
