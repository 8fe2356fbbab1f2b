//! Stack 'n' Shake - catch falling pieces, stack them, shake the tower off
//!
//! Core modules:
//! - `sim`: Deterministic simulation (piece pool, box physics, stacking, scoring)
//! - `scene`: Menu / play / game-over scene machine
//! - `highscores`: Top-3 leaderboard
//! - `persistence`: Key-value storage (LocalStorage on web)
//! - `platform`: Browser/native input mapping
//! - `config`: Immutable per-session configuration

pub mod config;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod scene;
pub mod sim;

pub use config::SessionConfig;
pub use error::GameError;
pub use highscores::HighScores;
pub use scene::{Game, RoundResult, Scene, SceneKind, Transition};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Simulation ticks per real-time second
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 600.0;
    pub const FIELD_HEIGHT: f32 = 700.0;

    /// Pieces spawn a bit below the top edge
    pub const SPAWN_Y: f32 = 10.0;

    /// Player platform
    pub const PLATFORM_WIDTH: f32 = 160.0;
    pub const PLATFORM_HEIGHT: f32 = 20.0;

    /// Gravity (units/s²) and terminal fall speed for free pieces
    pub const GRAVITY: f32 = 600.0;
    pub const MAX_FALL_SPEED: f32 = 400.0;

    /// Fraction of the velocity difference a resting piece picks up from its support each tick
    pub const SUPPORT_GRIP: f32 = 0.2;
    /// Vertical slack when deciding whether a body rests on another
    pub const CONTACT_EPSILON: f32 = 1.0;
}
