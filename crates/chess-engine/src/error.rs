//! Move rejection reasons.

use chess_core::{Color, Piece};
use thiserror::Error;

/// Why a proposed move was rejected.
///
/// A rejection never changes the game: board, turn and history are left
/// exactly as they were before the attempt.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum MoveError {
    #[error("position ({row}, {col}) is outside the board")]
    InvalidPosition { row: i64, col: i64 },

    #[error("no piece at the source square")]
    NoPieceAtSource,

    #[error("not your turn: {expected} to move")]
    WrongTurn { expected: Color },

    #[error("cannot capture own piece")]
    FriendlyCapture,

    #[error("illegal {piece} move")]
    IllegalPieceMove { piece: Piece },

    #[error("game has already ended")]
    GameAlreadyOver,
}
