//! Piece shapes and the piece entity

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Piece shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceShape {
    Rectangle,
    Square,
    Tee,
    Corner,
    Bucket,
}

impl PieceShape {
    pub const ALL: [PieceShape; 5] = [
        PieceShape::Rectangle,
        PieceShape::Square,
        PieceShape::Tee,
        PieceShape::Corner,
        PieceShape::Bucket,
    ];

    /// Map a roll in `0..=5` to a shape. 5 is a second square.
    pub fn from_index(index: u8) -> Result<Self> {
        match index {
            0 => Ok(PieceShape::Rectangle),
            1 | 5 => Ok(PieceShape::Square),
            2 => Ok(PieceShape::Tee),
            3 => Ok(PieceShape::Corner),
            4 => Ok(PieceShape::Bucket),
            other => Err(GameError::UnknownShape(other.to_string())),
        }
    }

    /// Roll a random shape (squares twice as likely)
    pub fn random(rng: &mut impl Rng) -> Result<Self> {
        Self::from_index(rng.random_range(0u8..=5))
    }

    /// Unrotated (width, height)
    pub fn size(&self) -> Vec2 {
        match self {
            PieceShape::Rectangle => Vec2::new(80.0, 40.0),
            PieceShape::Square => Vec2::new(40.0, 40.0),
            PieceShape::Tee => Vec2::new(120.0, 80.0),
            PieceShape::Corner => Vec2::new(80.0, 80.0),
            PieceShape::Bucket => Vec2::new(120.0, 80.0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceShape::Rectangle => "rectangle",
            PieceShape::Square => "square",
            PieceShape::Tee => "tee",
            PieceShape::Corner => "corner",
            PieceShape::Bucket => "bucket",
        }
    }
}

impl fmt::Display for PieceShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PieceShape {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        PieceShape::ALL
            .into_iter()
            .find(|shape| shape.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| GameError::UnknownShape(s.to_string()))
    }
}

/// Rotation in quarter turns (0..=3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Orientation(u8);

impl Orientation {
    pub fn new(quarter_turns: u8) -> Self {
        Self(quarter_turns % 4)
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self(rng.random_range(0..4))
    }

    pub fn quarter_turns(&self) -> u8 {
        self.0
    }

    /// Rotation in degrees, for the renderer
    pub fn degrees(&self) -> f32 {
        f32::from(self.0) * 90.0
    }

    /// Odd quarter turns swap width and height
    pub fn is_sideways(&self) -> bool {
        self.0 % 2 == 1
    }
}

/// A falling or stacked piece. Alive/dead is owned by the pool slot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Piece {
    pub shape: PieceShape,
    pub orientation: Orientation,
    /// Centre position
    pub pos: Vec2,
    pub vel: Vec2,
    /// Resting on the platform or on another stacked piece
    pub stacked: bool,
}

impl Piece {
    pub fn new(shape: PieceShape, orientation: Orientation) -> Self {
        Self {
            shape,
            orientation,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            stacked: false,
        }
    }

    /// Random shape and orientation
    pub fn random(rng: &mut impl Rng) -> Result<Self> {
        let shape = PieceShape::random(rng)?;
        Ok(Self::new(shape, Orientation::random(rng)))
    }

    /// Axis-aligned half extents after rotation
    pub fn half_extents(&self) -> Vec2 {
        let size = self.shape.size();
        let size = if self.orientation.is_sideways() {
            Vec2::new(size.y, size.x)
        } else {
            size
        };
        size / 2.0
    }

    pub fn top(&self) -> f32 {
        self.pos.y - self.half_extents().y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.half_extents().y
    }

    pub fn left(&self) -> f32 {
        self.pos.x - self.half_extents().x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.half_extents().x
    }

    /// Clear motion and stacking (on kill and on revive)
    pub fn reset(&mut self) {
        self.vel = Vec2::ZERO;
        self.stacked = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_from_index() {
        assert_eq!(PieceShape::from_index(0).unwrap(), PieceShape::Rectangle);
        assert_eq!(PieceShape::from_index(1).unwrap(), PieceShape::Square);
        assert_eq!(PieceShape::from_index(5).unwrap(), PieceShape::Square);
        assert_eq!(PieceShape::from_index(4).unwrap(), PieceShape::Bucket);
        assert!(matches!(
            PieceShape::from_index(6),
            Err(GameError::UnknownShape(_))
        ));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("tee".parse::<PieceShape>().unwrap(), PieceShape::Tee);
        assert_eq!("Corner".parse::<PieceShape>().unwrap(), PieceShape::Corner);
        assert!("triangle".parse::<PieceShape>().is_err());
    }

    #[test]
    fn test_random_covers_every_shape() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(PieceShape::random(&mut rng).unwrap());
        }
        assert_eq!(seen.len(), PieceShape::ALL.len());
    }

    #[test]
    fn test_sideways_swaps_extents() {
        let upright = Piece::new(PieceShape::Rectangle, Orientation::new(0));
        let sideways = Piece::new(PieceShape::Rectangle, Orientation::new(3));
        assert_eq!(upright.half_extents(), Vec2::new(40.0, 20.0));
        assert_eq!(sideways.half_extents(), Vec2::new(20.0, 40.0));
        assert_eq!(Orientation::new(6).quarter_turns(), 2);
    }

    #[test]
    fn test_edges() {
        let mut piece = Piece::new(PieceShape::Tee, Orientation::new(0));
        piece.pos = Vec2::new(100.0, 200.0);
        assert_eq!(piece.left(), 40.0);
        assert_eq!(piece.right(), 160.0);
        assert_eq!(piece.top(), 160.0);
        assert_eq!(piece.bottom(), 240.0);
    }
}
