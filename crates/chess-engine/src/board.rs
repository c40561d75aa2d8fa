//! 8x8 board representation.

use chess_core::{Color, ColoredPiece, Piece, Square};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Row-major wire form of a board: `grid[row][col]` holds a one-letter
/// piece code or `""` for an empty square.
pub type BoardGrid = Vec<Vec<String>>;

/// Errors that can occur when building a board from external input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("invalid board: expected 8 rows, got {0}")]
    InvalidRowCount(usize),

    #[error("invalid board: row {row} has {len} squares")]
    InvalidRowLength { row: usize, len: usize },

    #[error("invalid board: unknown piece code {code:?} at ({row}, {col})")]
    InvalidPieceCode { row: usize, col: usize, code: String },
}

/// Piece placement of the standard starting position, Black's back rank
/// first.
pub const STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// An 8x8 chess board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "BoardGrid", try_from = "BoardGrid")]
pub struct Board {
    squares: [Option<ColoredPiece>; 64],
}

impl Default for Board {
    fn default() -> Self {
        Self::startpos()
    }
}

impl Board {
    /// Creates a board with no pieces.
    pub const fn empty() -> Self {
        Board {
            squares: [None; 64],
        }
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        const BACK_RANK: [Piece; 8] = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];

        let mut board = Board::empty();
        for color in Color::ALL {
            let back = color.back_rank();
            let pawns = color.pawn_start_row();
            for (col, kind) in (0u8..8).zip(BACK_RANK) {
                board.put(back, col, ColoredPiece::new(kind, color));
                board.put(pawns, col, ColoredPiece::new(Piece::Pawn, color));
            }
        }
        board
    }

    /// Builds a board from a FEN-style piece placement (e.g. [`STARTPOS`]).
    ///
    /// Ranks are separated by `/` and listed from row 0 to row 7; digits
    /// count consecutive empty squares.
    pub fn from_placement(placement: &str) -> Result<Self, BoardError> {
        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != 8 {
            return Err(BoardError::InvalidRowCount(rows.len()));
        }

        let mut board = Board::empty();
        for (row, text) in rows.iter().enumerate() {
            let mut col = 0usize;
            for c in text.chars() {
                if let Some(skip) = c.to_digit(10) {
                    col += skip as usize;
                    continue;
                }
                let piece = ColoredPiece::from_char(c).ok_or_else(|| {
                    BoardError::InvalidPieceCode {
                        row,
                        col,
                        code: c.to_string(),
                    }
                })?;
                if col < 8 {
                    board.squares[row * 8 + col] = Some(piece);
                }
                col += 1;
            }
            if col != 8 {
                return Err(BoardError::InvalidRowLength { row, len: col });
            }
        }
        Ok(board)
    }

    /// Returns the piece on a square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<ColoredPiece> {
        self.squares[sq.index() as usize]
    }

    /// Returns true if the square holds no piece.
    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.piece_at(sq).is_none()
    }

    pub(crate) fn set(&mut self, sq: Square, piece: ColoredPiece) {
        self.squares[sq.index() as usize] = Some(piece);
    }

    pub(crate) fn clear(&mut self, sq: Square) -> Option<ColoredPiece> {
        self.squares[sq.index() as usize].take()
    }

    fn put(&mut self, row: u8, col: u8, piece: ColoredPiece) {
        self.squares[(row * 8 + col) as usize] = Some(piece);
    }

    /// Finds the first king of the given color in row-major order.
    pub fn find_king(&self, color: Color) -> Option<Square> {
        let king = ColoredPiece::new(Piece::King, color);
        Square::all().find(|&sq| self.piece_at(sq) == Some(king))
    }

    /// Iterates over the squares occupied by pieces of the given color.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, ColoredPiece)> + '_ {
        Square::all().filter_map(move |sq| match self.piece_at(sq) {
            Some(piece) if piece.color == color => Some((sq, piece)),
            _ => None,
        })
    }

    /// Returns true if every square strictly between `from` and `to` is
    /// empty, walking one step at a time toward `to`.
    ///
    /// Callers must only pass aligned squares (same row, same column, or
    /// same diagonal); the walk steps both axes by their sign.
    pub fn is_path_clear(&self, from: Square, to: Square) -> bool {
        let d_row = (to.row() as i8 - from.row() as i8).signum();
        let d_col = (to.col() as i8 - from.col() as i8).signum();

        let mut current = from.offset(d_row, d_col);
        while let Some(sq) = current {
            if sq == to {
                return true;
            }
            if !self.is_empty(sq) {
                return false;
            }
            current = sq.offset(d_row, d_col);
        }
        true
    }

    /// Returns the row-major grid of piece codes.
    pub fn to_grid(&self) -> BoardGrid {
        (0..8)
            .map(|row| {
                (0..8)
                    .map(|col| match self.squares[row * 8 + col] {
                        Some(piece) => piece.to_char().to_string(),
                        None => String::new(),
                    })
                    .collect()
            })
            .collect()
    }
}

impl From<Board> for BoardGrid {
    fn from(board: Board) -> Self {
        board.to_grid()
    }
}

impl TryFrom<BoardGrid> for Board {
    type Error = BoardError;

    fn try_from(grid: BoardGrid) -> Result<Self, Self::Error> {
        if grid.len() != 8 {
            return Err(BoardError::InvalidRowCount(grid.len()));
        }

        let mut board = Board::empty();
        for (row, cells) in grid.iter().enumerate() {
            if cells.len() != 8 {
                return Err(BoardError::InvalidRowLength {
                    row,
                    len: cells.len(),
                });
            }
            for (col, code) in cells.iter().enumerate() {
                if code.is_empty() {
                    continue;
                }
                let piece = ColoredPiece::try_from(code.as_str()).map_err(|_| {
                    BoardError::InvalidPieceCode {
                        row,
                        col,
                        code: code.clone(),
                    }
                })?;
                board.squares[row * 8 + col] = Some(piece);
            }
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..8 {
            write!(f, "{} ", 8 - row)?;
            for col in 0..8 {
                match self.squares[row * 8 + col] {
                    Some(piece) => write!(f, "{} ", piece)?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board")?;
        write!(f, "{}", self)
    }
}
