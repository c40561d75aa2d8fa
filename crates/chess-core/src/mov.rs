//! Move representation.

use crate::{ColoredPiece, Piece, Square};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry in a game's move history.
///
/// Records are immutable once appended: they capture what stood on the
/// source square, what (if anything) was taken on the destination, and the
/// piece a pawn was promoted to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    /// The piece that moved, as it stood before the move.
    pub piece: ColoredPiece,
    pub captured: Option<ColoredPiece>,
    pub promotion: Option<Piece>,
}

impl Move {
    /// Creates a quiet move record (no capture, no promotion).
    #[inline]
    pub const fn new(from: Square, to: Square, piece: ColoredPiece) -> Self {
        Move {
            from,
            to,
            piece,
            captured: None,
            promotion: None,
        }
    }

    /// Returns the coordinate notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(&self) -> String {
        let promo = match self.promotion {
            Some(piece) => piece.to_char().to_string(),
            None => String::new(),
        };
        format!("{}{}{}", self.from, self.to, promo)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} {})", self.piece, self.to_uci())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}
