//! Per-frame view of a round for the host renderer

use serde::{Deserialize, Serialize};

use super::piece::PieceShape;
use super::state::{GameState, RoundPhase};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PieceSnapshot {
    pub slot: usize,
    pub shape: PieceShape,
    /// Rotation in degrees
    pub angle: f32,
    pub x: f32,
    pub y: f32,
    pub stacked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformSnapshot {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub field_width: f32,
    pub field_height: f32,
    pub platform: PlatformSnapshot,
    pub pieces: Vec<PieceSnapshot>,
    /// Where the next piece will drop
    pub warning: Option<(f32, f32)>,
    pub score: u64,
    pub timer: u32,
    pub stacked: usize,
    pub over: bool,
}

impl From<&GameState> for RoundSnapshot {
    fn from(state: &GameState) -> Self {
        Self {
            field_width: state.config.field_width,
            field_height: state.config.field_height,
            platform: PlatformSnapshot {
                x: state.platform.pos.x,
                y: state.platform.pos.y,
                width: state.platform.size.x,
                height: state.platform.size.y,
            },
            pieces: state
                .pieces
                .iter_alive()
                .map(|(slot, p)| PieceSnapshot {
                    slot,
                    shape: p.shape,
                    angle: p.orientation.degrees(),
                    x: p.pos.x,
                    y: p.pos.y,
                    stacked: p.stacked,
                })
                .collect(),
            warning: state.spawner.active().map(|w| (w.pos.x, w.pos.y)),
            score: state.round.score,
            timer: state.round.timer,
            stacked: state.round.stacked_count,
            over: state.phase == RoundPhase::Over,
        }
    }
}
