//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No rendering or platform dependencies

pub mod physics;
pub mod piece;
pub mod pool;
pub mod snapshot;
pub mod stack;
pub mod state;
pub mod tick;
pub mod timer;
pub mod warning;

pub use physics::{Contact, Support};
pub use piece::{Orientation, Piece, PieceShape};
pub use pool::Pool;
pub use snapshot::{PieceSnapshot, PlatformSnapshot, RoundSnapshot};
pub use state::{GameEvent, GameState, Platform, RoundPhase, RoundState};
pub use tick::{TickInput, tick};
pub use timer::RepeatingTimer;
pub use warning::{Spawner, Warning};
