//! Axis-aligned box physics
//!
//! A deliberately small stand-in for a rigid-body engine: gravity, landing on
//! supports, and horizontal drag from whatever a piece rests on. Supports are
//! the platform and stacked pieces; falling pieces pass through each other.

use super::piece::Piece;
use super::pool::Pool;
use super::state::Platform;
use crate::consts::*;

/// What a piece is resting on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Support {
    Platform,
    Piece(usize),
}

/// A resting contact produced by a physics step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub slot: usize,
    pub support: Support,
    /// Downward speed the piece had when the contact was resolved
    pub fall_speed: f32,
}

/// A surface something can land on
#[derive(Debug, Clone, Copy)]
struct Surface {
    support: Support,
    top: f32,
    left: f32,
    right: f32,
    vel_x: f32,
}

impl Surface {
    fn platform(platform: &Platform) -> Self {
        Self {
            support: Support::Platform,
            top: platform.top(),
            left: platform.left(),
            right: platform.right(),
            vel_x: platform.vel_x,
        }
    }

    fn piece(slot: usize, piece: &Piece) -> Self {
        Self {
            support: Support::Piece(slot),
            top: piece.top(),
            left: piece.left(),
            right: piece.right(),
            vel_x: piece.vel.x,
        }
    }

    fn overlaps(&self, piece: &Piece) -> bool {
        piece.right() > self.left && piece.left() < self.right
    }
}

/// Advance every live piece by `dt`, appending resting contacts to `contacts`.
///
/// Pieces are stepped lowest first so a support has already moved when the
/// piece above it looks for it.
pub fn step(pieces: &mut Pool<Piece>, platform: &Platform, dt: f32, contacts: &mut Vec<Contact>) {
    contacts.clear();

    let mut order: Vec<(usize, f32)> = pieces.iter_alive().map(|(i, p)| (i, p.bottom())).collect();
    order.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    for (slot, _) in order {
        let Some(mut piece) = pieces.get(slot).copied() else {
            continue;
        };

        let surfaces = surfaces_under(pieces, platform, slot, &piece);

        // Already resting?
        let resting = if piece.vel.y >= 0.0 {
            surfaces
                .iter()
                .filter(|s| (piece.bottom() - s.top).abs() <= CONTACT_EPSILON)
                .min_by(|a, b| a.top.total_cmp(&b.top))
                .copied()
        } else {
            None
        };

        let landed = match resting {
            Some(surface) => Some(surface),
            None => {
                piece.vel.y = (piece.vel.y + GRAVITY * dt).min(MAX_FALL_SPEED);
                let old_bottom = piece.bottom();
                let new_bottom = old_bottom + piece.vel.y * dt;
                let hit = surfaces
                    .iter()
                    .filter(|s| old_bottom <= s.top + CONTACT_EPSILON && new_bottom >= s.top)
                    .min_by(|a, b| a.top.total_cmp(&b.top))
                    .copied();
                if hit.is_none() {
                    piece.pos.y += piece.vel.y * dt;
                }
                hit
            }
        };

        if let Some(surface) = landed {
            let fall_speed = piece.vel.y;
            piece.pos.y = surface.top - piece.half_extents().y;
            piece.vel.y = 0.0;
            piece.vel.x += (surface.vel_x - piece.vel.x) * SUPPORT_GRIP;
            contacts.push(Contact {
                slot,
                support: surface.support,
                fall_speed,
            });
        }

        piece.pos.x += piece.vel.x * dt;

        if let Some(p) = pieces.get_mut(slot) {
            *p = piece;
        }
    }
}

/// Candidate supports horizontally overlapping `piece`
fn surfaces_under(pieces: &Pool<Piece>, platform: &Platform, slot: usize, piece: &Piece) -> Vec<Surface> {
    std::iter::once(Surface::platform(platform))
        .chain(
            pieces
                .iter_alive()
                .filter(|(i, p)| *i != slot && p.stacked)
                .map(|(i, p)| Surface::piece(i, p)),
        )
        .filter(|s| s.overlaps(piece))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::piece::{Orientation, PieceShape};
    use glam::Vec2;

    fn pool_with(pieces: &[Piece]) -> Pool<Piece> {
        let mut iter = pieces.iter().copied();
        let mut pool = Pool::fill(pieces.len(), || iter.next().unwrap());
        for _ in pieces {
            pool.revive_next();
        }
        pool
    }

    fn square_at(x: f32, y: f32) -> Piece {
        let mut piece = Piece::new(PieceShape::Square, Orientation::new(0));
        piece.pos = Vec2::new(x, y);
        piece
    }

    #[test]
    fn test_free_piece_falls() {
        let platform = Platform::new(600.0, 700.0);
        let mut pool = pool_with(&[square_at(50.0, 100.0)]);
        let mut contacts = Vec::new();

        step(&mut pool, &platform, SIM_DT, &mut contacts);

        let piece = pool.get(0).unwrap();
        assert!(piece.pos.y > 100.0);
        assert!(piece.vel.y > 0.0);
        assert!(contacts.is_empty());
    }

    #[test]
    fn test_fall_speed_is_capped() {
        let platform = Platform::new(600.0, 700.0);
        let mut pool = pool_with(&[square_at(20.0, 0.0)]);
        let mut contacts = Vec::new();
        for _ in 0..200 {
            step(&mut pool, &platform, SIM_DT, &mut contacts);
        }
        assert_eq!(pool.get(0).unwrap().vel.y, MAX_FALL_SPEED);
    }

    #[test]
    fn test_lands_on_platform() {
        let platform = Platform::new(600.0, 700.0);
        let mut pool = pool_with(&[square_at(300.0, 400.0)]);
        let mut contacts = Vec::new();

        let mut landed = false;
        for _ in 0..300 {
            step(&mut pool, &platform, SIM_DT, &mut contacts);
            if !contacts.is_empty() {
                landed = true;
                break;
            }
        }

        assert!(landed);
        assert_eq!(contacts[0].support, Support::Platform);
        let piece = pool.get(0).unwrap();
        assert_eq!(piece.bottom(), platform.top());
        assert_eq!(piece.vel.y, 0.0);
    }

    #[test]
    fn test_falling_pieces_pass_through_each_other() {
        let platform = Platform::new(600.0, 700.0);
        let mut pool = pool_with(&[square_at(50.0, 300.0), square_at(50.0, 262.0)]);
        let mut contacts = Vec::new();
        step(&mut pool, &platform, SIM_DT, &mut contacts);
        assert!(contacts.is_empty());
    }

    #[test]
    fn test_lands_on_stacked_piece() {
        let platform = Platform::new(600.0, 700.0);
        let mut base = square_at(300.0, platform.top() - 20.0);
        base.stacked = true;
        let mut pool = pool_with(&[base, square_at(300.0, 400.0)]);
        let mut contacts = Vec::new();

        for _ in 0..300 {
            step(&mut pool, &platform, SIM_DT, &mut contacts);
            if contacts.iter().any(|c| c.slot == 1) {
                break;
            }
        }

        let contact = contacts.iter().find(|c| c.slot == 1).unwrap();
        assert_eq!(contact.support, Support::Piece(0));
        assert_eq!(pool.get(1).unwrap().bottom(), pool.get(0).unwrap().top());
    }

    #[test]
    fn test_resting_piece_is_dragged_by_platform() {
        let mut platform = Platform::new(600.0, 700.0);
        platform.vel_x = 100.0;
        let mut piece = square_at(300.0, platform.top() - 20.0);
        piece.stacked = true;
        let mut pool = pool_with(&[piece]);
        let mut contacts = Vec::new();

        step(&mut pool, &platform, SIM_DT, &mut contacts);

        let piece = pool.get(0).unwrap();
        assert!((piece.vel.x - 100.0 * SUPPORT_GRIP).abs() < 1e-4);
        assert!(piece.pos.x > 300.0);
        assert_eq!(contacts.len(), 1);
    }

    #[test]
    fn test_unsupported_stacked_piece_falls() {
        let platform = Platform::new(600.0, 700.0);
        let mut piece = square_at(20.0, platform.top() - 20.0);
        piece.stacked = true;
        let mut pool = pool_with(&[piece]);
        let mut contacts = Vec::new();

        step(&mut pool, &platform, SIM_DT, &mut contacts);

        let piece = pool.get(0).unwrap();
        assert!(piece.vel.y > 0.0);
        assert!(piece.stacked);
        assert!(contacts.is_empty());
    }
}
