//! Stacking and collapse rules
//!
//! A piece is `falling` until it settles on the platform or on a stacked
//! piece, then `stacked` until the tower collapses. Pieces that leave the
//! bottom of the field are either lost quietly (falling) or trigger a
//! collapse of the whole tower (stacked).

use super::physics::{Contact, Support};
use super::state::{GameEvent, GameState};

/// Promote settled pieces to stacked.
///
/// A contact counts only if the piece's downward speed is under the
/// threshold and its support is the platform or an already-stacked piece.
pub fn apply_contacts(state: &mut GameState, contacts: &[Contact]) {
    let threshold = state.config.stack_speed_threshold;
    for contact in contacts {
        if contact.fall_speed >= threshold {
            continue;
        }
        let support_stacked = match contact.support {
            Support::Platform => true,
            Support::Piece(slot) => {
                state.pieces.is_alive(slot) && state.pieces.get(slot).is_some_and(|p| p.stacked)
            }
        };
        if !support_stacked || !state.pieces.is_alive(contact.slot) {
            continue;
        }
        if let Some(piece) = state.pieces.get_mut(contact.slot) {
            if !piece.stacked {
                piece.stacked = true;
                state.events.push(GameEvent::PieceStacked { slot: contact.slot });
            }
        }
    }
}

/// Kill every stacked piece and credit the reward. Returns the number of
/// pieces cashed in.
pub fn collapse(state: &mut GameState) -> usize {
    let stacked: Vec<usize> = state
        .pieces
        .iter_alive()
        .filter(|(_, p)| p.stacked)
        .map(|(i, _)| i)
        .collect();
    let count = stacked.len();
    for slot in stacked {
        state.kill_piece(slot);
    }

    let points = state.config.points_per_piece * count as u64;
    let bonus_secs = state.config.bonus_secs_per_piece * count as u32;
    state.round.score += points;
    state.round.timer += bonus_secs;
    state.round.stacked_count = 0;
    state.round.prev_stacked_count = 0;

    log::debug!(
        "Tower collapsed: {} pieces, +{} points, +{}s",
        count,
        points,
        bonus_secs
    );
    state.events.push(GameEvent::Collapse {
        pieces: count,
        points,
        bonus_secs,
    });
    count
}

/// Handle pieces below the bottom edge.
///
/// Any stacked piece off the field collapses the whole tower (once per
/// tick). Falling pieces off the field are killed without penalty.
pub fn check_bounds(state: &mut GameState) {
    let floor = state.config.field_height;
    let mut tower_fell = false;
    let mut lost = Vec::new();
    for (slot, piece) in state.pieces.iter_alive() {
        if piece.pos.y > floor {
            if piece.stacked {
                tower_fell = true;
            } else {
                lost.push(slot);
            }
        }
    }

    if tower_fell {
        collapse(state);
    }
    for slot in lost {
        state.kill_piece(slot);
        state.events.push(GameEvent::PieceLost { slot });
    }
}

/// Refresh the stacked count; raises `StackGrew` when it went up
pub fn track_stack_growth(state: &mut GameState) {
    let count = state.stacked_count();
    state.round.prev_stacked_count = state.round.stacked_count;
    state.round.stacked_count = count;
    if count > state.round.prev_stacked_count {
        state.events.push(GameEvent::StackGrew { count });
    }
}
