//! Core types for chess.
//!
//! This crate provides the fundamental types shared by the rule engine and
//! the server:
//! - [`Color`] for the two sides
//! - [`Piece`] and [`ColoredPiece`] for piece representation
//! - [`Square`] for `(row, col)` board coordinates
//! - [`Move`] for entries in the move history

mod color;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use mov::Move;
pub use piece::{ColoredPiece, Piece, PieceCodeError};
pub use square::{Square, SquareError};
