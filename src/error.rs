//! Error types
//!
//! Construction errors (bad shape, bad config) are fatal for the object being
//! built. Everything that happens during play is a steady-state event, not an error.

/// Main error type for the game
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Unknown piece shape: {0}")]
    UnknownShape(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
