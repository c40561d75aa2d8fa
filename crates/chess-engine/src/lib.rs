//! Rule engine for a server-authoritative chess game.
//!
//! This crate provides:
//! - [`Board`] - 8x8 grid of pieces with its row-major wire encoding
//! - [`rules`] - per-piece movement, move validation and checkmate detection
//! - [`Game`] - the owned game state: board, turn, history and game-over flag
//! - [`GameSnapshot`] - an owned copy of that state for observers
//!
//! The rule set is a simplified subset of chess: there is no check, stalemate
//! or draw detection, pawns always promote to a queen, castling moves only
//! the king, and a side with no legal move (or no king) is checkmated.
//!
//! # Example
//!
//! ```
//! use chess_engine::{Game, MoveOutcome};
//! use chess_core::Color;
//!
//! let mut game = Game::new();
//! assert_eq!(game.attempt_move((6, 4), (4, 4)), Ok(MoveOutcome::Accepted));
//! assert_eq!(game.current_turn(), Color::Black);
//! assert_eq!(game.board().to_grid()[4][4], "P");
//! ```

mod board;
mod error;
mod game;
pub mod rules;

pub use board::{Board, BoardError, BoardGrid, STARTPOS};
pub use error::MoveError;
pub use game::{Game, GameSnapshot, GameStatus, MoveOutcome};
