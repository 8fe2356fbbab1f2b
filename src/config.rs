//! Session configuration
//!
//! Immutable for the lifetime of a session and passed explicitly to every
//! scene. Persisted as JSON next to the high scores.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, Result};
use crate::persistence::Storage;

/// Game balance and playfield settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    // === Playfield ===
    pub field_width: f32,
    pub field_height: f32,

    // === Pools ===
    /// Number of pooled pieces
    pub piece_pool: usize,
    /// Number of pooled spawn warnings
    pub warning_pool: usize,

    // === Round ===
    /// Countdown start (seconds)
    pub round_seconds: u32,
    /// Seconds between piece spawns
    pub spawn_interval_secs: u32,

    // === Collapse reward ===
    /// Points per stacked piece at collapse
    pub points_per_piece: u64,
    /// Seconds added to the countdown per stacked piece at collapse
    pub bonus_secs_per_piece: u32,

    // === Platform control ===
    /// Maximum platform speed (units/s)
    pub platform_max_speed: f32,
    /// Speed change per tick while a key is held (and decay per tick when released)
    pub platform_accel: f32,

    // === Stacking ===
    /// Downward speed below which a resting piece counts as stacked
    pub stack_speed_threshold: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            piece_pool: 40,
            warning_pool: 5,

            round_seconds: 60,
            spawn_interval_secs: 2,

            points_per_piece: 50,
            bonus_secs_per_piece: 1,

            platform_max_speed: 230.0,
            platform_accel: 10.0,

            stack_speed_threshold: 4.0,
        }
    }
}

impl SessionConfig {
    /// Storage key for the serialized config
    const STORAGE_KEY: &'static str = "stack_n_shake_config";

    /// Reject configurations a round cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.field_width <= PLATFORM_WIDTH {
            return Err(GameError::InvalidConfig(format!(
                "field_width {} must exceed platform width {}",
                self.field_width, PLATFORM_WIDTH
            )));
        }
        if self.field_height <= 0.0 {
            return Err(GameError::InvalidConfig(format!(
                "field_height {} must be positive",
                self.field_height
            )));
        }
        if self.piece_pool == 0 {
            return Err(GameError::InvalidConfig("piece_pool must be at least 1".into()));
        }
        if self.warning_pool == 0 {
            return Err(GameError::InvalidConfig("warning_pool must be at least 1".into()));
        }
        if self.round_seconds == 0 {
            return Err(GameError::InvalidConfig("round_seconds must be at least 1".into()));
        }
        if self.spawn_interval_secs == 0 {
            return Err(GameError::InvalidConfig(
                "spawn_interval_secs must be at least 1".into(),
            ));
        }
        if self.platform_max_speed <= 0.0 || self.platform_accel <= 0.0 {
            return Err(GameError::InvalidConfig(
                "platform speed and acceleration must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Load config from storage, falling back to defaults
    pub fn load(storage: &dyn Storage) -> Self {
        match storage.get(Self::STORAGE_KEY) {
            Some(json) => match serde_json::from_str::<SessionConfig>(&json) {
                Ok(config) => {
                    log::info!("Loaded session config from storage");
                    config
                }
                Err(e) => {
                    log::warn!("Stored config is unreadable ({}), using defaults", e);
                    Self::default()
                }
            },
            None => {
                log::info!("Using default session config");
                Self::default()
            }
        }
    }

    /// Save config to storage
    pub fn save(&self, storage: &mut dyn Storage) -> Result<()> {
        let json = serde_json::to_string(self)?;
        storage.set(Self::STORAGE_KEY, &json)?;
        log::info!("Session config saved");
        Ok(())
    }

    /// Ticks between piece spawns
    pub fn spawn_interval_ticks(&self) -> u32 {
        self.spawn_interval_secs * TICKS_PER_SECOND
    }
}
