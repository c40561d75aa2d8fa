//! Game state management with history tracking.
//!
//! The [`Game`] struct owns the board, the side to move, the move history
//! and the game-over flag. It is the only place any of them change:
//! callers propose moves and read back [`GameSnapshot`]s.

use chess_core::{Color, ColoredPiece, Move, Piece, Square};
use serde::{Deserialize, Serialize};

use crate::rules;
use crate::{Board, MoveError};

/// Result of an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveOutcome {
    /// The move was applied and the other side is now to move.
    Accepted,
    /// The move was applied and left the other side without a legal move.
    Checkmate,
}

/// Lifecycle of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    /// Terminal until [`Game::reset`].
    GameOver,
}

/// Owned copy of the observable game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub board: Board,
    pub moves: Vec<Move>,
    pub turn: Color,
    pub game_over: bool,
}

/// A chess game with history tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    turn: Color,
    moves: Vec<Move>,
    game_over: bool,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::from_board(Board::startpos(), Color::White)
    }

    /// Creates a game from a custom board with `turn` to move and an empty
    /// history.
    pub fn from_board(board: Board, turn: Color) -> Self {
        Game {
            board,
            turn,
            moves: Vec::new(),
            game_over: false,
        }
    }

    /// Returns a reference to the current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the move history.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Returns the side to move (the winner once the game is over).
    pub fn current_turn(&self) -> Color {
        self.turn
    }

    /// Returns true if the game has ended.
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn status(&self) -> GameStatus {
        if self.game_over {
            GameStatus::GameOver
        } else {
            GameStatus::InProgress
        }
    }

    /// Returns the number of half-moves (plies) played.
    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    /// Copies the observable state for broadcasting.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board,
            moves: self.moves.clone(),
            turn: self.turn,
            game_over: self.game_over,
        }
    }

    /// Lists the squares the piece on `from` may move to, ignoring whose
    /// turn it is.
    pub fn legal_destinations(&self, from: Square) -> Vec<Square> {
        rules::legal_destinations(&self.board, &self.moves, from)
    }

    /// Attempts a move given as untrusted `(row, col)` coordinates.
    ///
    /// Rejections are checked in order: game over, coordinates off the
    /// board, then the checks of [`Game::make_move`]. A rejected move leaves
    /// the game untouched.
    pub fn attempt_move(
        &mut self,
        from: (i64, i64),
        to: (i64, i64),
    ) -> Result<MoveOutcome, MoveError> {
        if self.game_over {
            return Err(MoveError::GameAlreadyOver);
        }
        let from = to_square(from)?;
        let to = to_square(to)?;
        self.make_move(from, to)
    }

    /// Makes a move between two board squares.
    pub fn make_move(&mut self, from: Square, to: Square) -> Result<MoveOutcome, MoveError> {
        if self.game_over {
            return Err(MoveError::GameAlreadyOver);
        }

        let piece = rules::validate(&self.board, &self.moves, self.turn, from, to)?;
        Ok(self.apply_move(piece, from, to))
    }

    /// Applies a validated move and settles the turn.
    fn apply_move(&mut self, piece: ColoredPiece, from: Square, to: Square) -> MoveOutcome {
        self.board.clear(from);
        let captured = self.board.piece_at(to);

        let promotion = (piece.kind == Piece::Pawn && to.row() == piece.color.promotion_row())
            .then_some(Piece::Queen);
        let landed = match promotion {
            Some(kind) => ColoredPiece::new(kind, piece.color),
            None => piece,
        };
        self.board.set(to, landed);

        self.moves.push(Move {
            from,
            to,
            piece,
            captured,
            promotion,
        });

        let next = self.turn.opposite();
        if rules::is_checkmate(&self.board, &self.moves, next) {
            self.game_over = true;
            return MoveOutcome::Checkmate;
        }

        self.turn = next;
        MoveOutcome::Accepted
    }

    /// Restores the starting position and returns its snapshot.
    pub fn reset(&mut self) -> GameSnapshot {
        *self = Game::new();
        self.snapshot()
    }
}

fn to_square((row, col): (i64, i64)) -> Result<Square, MoveError> {
    Square::from_coords(row, col).ok_or(MoveError::InvalidPosition { row, col })
}
