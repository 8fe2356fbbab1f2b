//! Tick-counted repeating timers
//!
//! Scheduled callbacks (spawn, countdown) run inside the fixed-step tick, so
//! they interleave deterministically with the per-frame update.

use serde::{Deserialize, Serialize};

/// Fires once every `interval` ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatingTimer {
    interval: u32,
    elapsed: u32,
}

impl RepeatingTimer {
    /// `interval` is clamped to at least one tick
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            elapsed: 0,
        }
    }

    /// Advance by one tick; true when the timer fires
    pub fn step(&mut self) -> bool {
        self.elapsed += 1;
        if self.elapsed >= self.interval {
            self.elapsed = 0;
            true
        } else {
            false
        }
    }
}
