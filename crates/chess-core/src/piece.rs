//! Chess piece representation.

use crate::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The six types of chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Piece {
    /// Returns the lowercase letter for this piece type.
    pub const fn to_char(self) -> char {
        match self {
            Piece::Pawn => 'p',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
        }
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Piece::Pawn => "pawn",
            Piece::Knight => "knight",
            Piece::Bishop => "bishop",
            Piece::Rook => "rook",
            Piece::Queen => "queen",
            Piece::King => "king",
        };
        write!(f, "{}", name)
    }
}

/// Error returned when a string is not a valid one-letter piece code.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid piece code: {0:?}")]
pub struct PieceCodeError(pub String);

/// A piece of a given kind belonging to one side.
///
/// On the wire a colored piece is a single letter: uppercase for White,
/// lowercase for Black (`"P"`, `"n"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ColoredPiece {
    pub kind: Piece,
    pub color: Color,
}

impl ColoredPiece {
    #[inline]
    pub const fn new(kind: Piece, color: Color) -> Self {
        ColoredPiece { kind, color }
    }

    #[inline]
    pub const fn white(kind: Piece) -> Self {
        ColoredPiece::new(kind, Color::White)
    }

    #[inline]
    pub const fn black(kind: Piece) -> Self {
        ColoredPiece::new(kind, Color::Black)
    }

    /// Returns the letter code for this piece.
    pub const fn to_char(self) -> char {
        let c = self.kind.to_char();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parses a letter code into a colored piece.
    pub const fn from_char(c: char) -> Option<Self> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => Piece::Pawn,
            'n' => Piece::Knight,
            'b' => Piece::Bishop,
            'r' => Piece::Rook,
            'q' => Piece::Queen,
            'k' => Piece::King,
            _ => return None,
        };
        Some(ColoredPiece { kind, color })
    }
}

impl std::fmt::Display for ColoredPiece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl From<ColoredPiece> for String {
    fn from(piece: ColoredPiece) -> Self {
        piece.to_char().to_string()
    }
}

impl TryFrom<&str> for ColoredPiece {
    type Error = PieceCodeError;

    fn try_from(code: &str) -> Result<Self, Self::Error> {
        let mut chars = code.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                ColoredPiece::from_char(c).ok_or_else(|| PieceCodeError(code.to_string()))
            }
            _ => Err(PieceCodeError(code.to_string())),
        }
    }
}

impl TryFrom<String> for ColoredPiece {
    type Error = PieceCodeError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        ColoredPiece::try_from(code.as_str())
    }
}
