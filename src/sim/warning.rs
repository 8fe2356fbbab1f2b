//! Spawn warnings
//!
//! One warning is on screen at a time, marking where the *next* piece will
//! drop. Each spawn retires it and arms a fresh one, so the marker always
//! runs one cycle ahead of the pieces.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::piece::PieceShape;
use super::pool::Pool;
use crate::consts::SPAWN_Y;

/// Marker for an upcoming spawn
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Warning {
    pub pos: Vec2,
}

/// Widest half-extent of any shape in any orientation
pub fn max_half_width() -> f32 {
    PieceShape::ALL
        .iter()
        .map(|s| s.size().max_element() / 2.0)
        .fold(0.0, f32::max)
}

/// Owns the warning pool and the currently displayed warning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    warnings: Pool<Warning>,
    active: Option<usize>,
}

impl Spawner {
    pub fn new(capacity: usize) -> Self {
        Self {
            warnings: Pool::fill(capacity, Warning::default),
            active: None,
        }
    }

    /// The warning on screen, if any
    pub fn active(&self) -> Option<&Warning> {
        self.active.and_then(|i| self.warnings.get(i))
    }

    /// Show a warning at a new random x, inset so any piece fits
    pub fn arm(&mut self, rng: &mut impl Rng, field_width: f32) {
        let margin = max_half_width();
        let x = rng.random_range(margin..=field_width - margin);
        self.active = self.warnings.revive_next();
        if let Some(warning) = self.active.and_then(|i| self.warnings.get_mut(i)) {
            warning.pos = Vec2::new(x, SPAWN_Y);
        }
    }

    /// Retire the displayed warning, arm the next one, and return the x the
    /// retired warning promised. Arms first if nothing was showing.
    pub fn advance(&mut self, rng: &mut impl Rng, field_width: f32) -> f32 {
        if self.active.is_none() {
            self.arm(rng, field_width);
        }
        let x = self.active().map(|w| w.pos.x).unwrap_or(field_width / 2.0);
        if let Some(i) = self.active.take() {
            if let Some(warning) = self.warnings.get_mut(i) {
                warning.pos = Vec2::ZERO;
            }
            self.warnings.kill(i);
        }
        self.arm(rng, field_width);
        x
    }

    /// Retire everything (session shutdown)
    pub fn clear(&mut self) {
        self.active = None;
        self.warnings.kill_all();
    }
}
