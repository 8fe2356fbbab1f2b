//! Round state and core simulation types
//!
//! Everything a round needs lives in `GameState`; it is created when play
//! starts and dropped when the round ends.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::piece::{Piece, PieceShape};
use super::pool::Pool;
use super::timer::RepeatingTimer;
use super::warning::Spawner;
use crate::config::SessionConfig;
use crate::consts::*;
use crate::error::Result;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Active gameplay
    Playing,
    /// Countdown hit zero; state is frozen
    Over,
}

/// Something the host may want to react to (sounds, HUD flashes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A dead piece was revived at the top of the field
    PieceSpawned { slot: usize, shape: PieceShape },
    /// Spawn timer fired with every piece already in play
    SpawnSkipped,
    /// A falling piece came to rest on the tower
    PieceStacked { slot: usize },
    /// Stacked count went up since last tick
    StackGrew { count: usize },
    /// A falling piece left the field without scoring
    PieceLost { slot: usize },
    /// The tower went off the bottom and was cashed in
    Collapse { pieces: usize, points: u64, bonus_secs: u32 },
    /// One second elapsed on the countdown
    CountdownTick { remaining: u32 },
    /// Countdown reached zero
    RoundOver { score: u64 },
}

/// The player's platform (kinematic: moved by input, never by pieces)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Platform {
    /// Centre position
    pub pos: Vec2,
    /// Horizontal velocity (units/s)
    pub vel_x: f32,
    pub size: Vec2,
}

impl Platform {
    /// Centred, one fifth of the field height above the bottom
    pub fn new(field_width: f32, field_height: f32) -> Self {
        Self {
            pos: Vec2::new(field_width / 2.0, field_height - field_height / 5.0),
            vel_x: 0.0,
            size: Vec2::new(PLATFORM_WIDTH, PLATFORM_HEIGHT),
        }
    }

    pub fn top(&self) -> f32 {
        self.pos.y - self.size.y / 2.0
    }

    pub fn left(&self) -> f32 {
        self.pos.x - self.size.x / 2.0
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    /// Apply one tick of the horizontal control law.
    ///
    /// `direction` is -1, 0 or 1. Held input ramps speed by `accel` toward
    /// `max_speed`; no input decays it by `accel` toward zero. Input held into
    /// a wall the platform is touching (or would reach this tick) counts as no
    /// input, so speed eases off at the boundary while the position stays
    /// clamped to the field.
    pub fn steer(&mut self, direction: i8, accel: f32, max_speed: f32, field_width: f32, dt: f32) {
        let half = self.size.x / 2.0;
        let ahead = self.pos.x + self.vel_x * dt;
        let blocked = match direction {
            d if d < 0 => ahead <= half,
            d if d > 0 => ahead >= field_width - half,
            _ => false,
        };

        if direction != 0 && !blocked {
            self.vel_x = (self.vel_x + f32::from(direction) * accel).clamp(-max_speed, max_speed);
        } else if self.vel_x > 0.0 {
            self.vel_x = (self.vel_x - accel).max(0.0);
        } else {
            self.vel_x = (self.vel_x + accel).min(0.0);
        }

        self.pos.x = (self.pos.x + self.vel_x * dt).clamp(half, field_width - half);
    }
}

/// Score and countdown for the current round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub score: u64,
    /// Seconds remaining
    pub timer: u32,
    /// Stacked pieces this tick
    pub stacked_count: usize,
    /// Stacked pieces last tick
    pub prev_stacked_count: usize,
}

/// Complete state of a round (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: SessionConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub pieces: Pool<Piece>,
    pub spawner: Spawner,
    pub platform: Platform,
    pub round: RoundState,
    pub phase: RoundPhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) spawn_timer: RepeatingTimer,
    pub(crate) countdown_timer: RepeatingTimer,
    /// Events raised since the caller last drained them
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a round: validates the config, fills both pools and arms the
    /// first warning. No piece is in play yet.
    pub fn new(config: &SessionConfig, seed: u64) -> Result<Self> {
        config.validate()?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let pieces = Pool::try_fill(config.piece_pool, || Piece::random(&mut rng))?;
        let mut spawner = Spawner::new(config.warning_pool);
        spawner.arm(&mut rng, config.field_width);

        Ok(Self {
            config: config.clone(),
            seed,
            rng,
            pieces,
            spawner,
            platform: Platform::new(config.field_width, config.field_height),
            round: RoundState {
                timer: config.round_seconds,
                ..Default::default()
            },
            phase: RoundPhase::Playing,
            time_ticks: 0,
            spawn_timer: RepeatingTimer::new(config.spawn_interval_ticks()),
            countdown_timer: RepeatingTimer::new(TICKS_PER_SECOND),
            events: Vec::new(),
        })
    }

    /// Revive a random dead piece at the x the current warning promised.
    /// Skips the spawn (returns None) when every piece is already in play.
    pub fn revive_one(&mut self) -> Option<usize> {
        let Some(slot) = self.pieces.revive_random(&mut self.rng) else {
            log::debug!("Piece pool exhausted, skipping spawn");
            self.events.push(GameEvent::SpawnSkipped);
            return None;
        };

        let field_width = self.config.field_width;
        let x = self.spawner.advance(&mut self.rng, field_width);

        let piece = self.pieces.get_mut(slot)?;
        piece.reset();
        let half = piece.half_extents().x;
        piece.pos = Vec2::new(x.clamp(half, field_width - half), SPAWN_Y);
        let shape = piece.shape;

        log::debug!("Spawned {} in slot {} at x={:.0}", shape, slot, piece.pos.x);
        self.events.push(GameEvent::PieceSpawned { slot, shape });
        Some(slot)
    }

    /// Kill a piece: clears stacking and motion and returns it to the pool
    pub fn kill_piece(&mut self, slot: usize) {
        if let Some(piece) = self.pieces.get_mut(slot) {
            piece.reset();
        }
        self.pieces.kill(slot);
    }

    /// Number of live stacked pieces
    pub fn stacked_count(&self) -> usize {
        self.pieces.iter_alive().filter(|(_, p)| p.stacked).count()
    }

    /// Is the round still running?
    pub fn is_playing(&self) -> bool {
        self.phase == RoundPhase::Playing
    }

    /// Take pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Release every pooled entity (scene shutdown)
    pub fn shutdown(&mut self) {
        let alive: Vec<usize> = self.pieces.iter_alive().map(|(i, _)| i).collect();
        for slot in alive {
            self.kill_piece(slot);
        }
        self.spawner.clear();
        self.events.clear();
    }
}
