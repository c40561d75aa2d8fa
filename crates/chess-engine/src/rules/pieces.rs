//! Per-piece movement rules.
//!
//! These functions only answer "can this piece travel from `from` to `to`
//! on this board". Turn order and friendly-capture checks happen in the
//! caller. No rule here looks at whether a king is attacked.

use chess_core::{Color, ColoredPiece, Move, Piece, Square};

use crate::Board;

/// Returns true if `piece` standing on `from` may move to `to`.
pub fn can_move(
    board: &Board,
    history: &[Move],
    piece: ColoredPiece,
    from: Square,
    to: Square,
) -> bool {
    match piece.kind {
        Piece::Pawn => pawn(board, piece.color, from, to),
        Piece::Knight => knight(from, to),
        Piece::Bishop => bishop(board, from, to),
        Piece::Rook => rook(board, from, to),
        Piece::Queen => queen(board, from, to),
        Piece::King => king(board, history, piece.color, from, to),
    }
}

fn deltas(from: Square, to: Square) -> (i8, i8) {
    (
        to.row() as i8 - from.row() as i8,
        to.col() as i8 - from.col() as i8,
    )
}

/// Single push onto an empty square, double push from the start row over
/// two empty squares, or a one-step diagonal capture. No en passant.
pub fn pawn(board: &Board, color: Color, from: Square, to: Square) -> bool {
    let (d_row, d_col) = deltas(from, to);
    let dir = color.pawn_direction();
    let target = board.piece_at(to);

    if d_col == 0 && target.is_none() {
        if d_row == dir {
            return true;
        }
        if from.row() == color.pawn_start_row() && d_row == 2 * dir {
            return from.offset(dir, 0).is_some_and(|mid| board.is_empty(mid));
        }
        return false;
    }

    d_col.abs() == 1 && d_row == dir && target.is_some_and(|t| t.color != color)
}

pub fn knight(from: Square, to: Square) -> bool {
    let (d_row, d_col) = deltas(from, to);
    matches!((d_row.abs(), d_col.abs()), (2, 1) | (1, 2))
}

pub fn bishop(board: &Board, from: Square, to: Square) -> bool {
    let (d_row, d_col) = deltas(from, to);
    d_row != 0 && d_row.abs() == d_col.abs() && board.is_path_clear(from, to)
}

pub fn rook(board: &Board, from: Square, to: Square) -> bool {
    let (d_row, d_col) = deltas(from, to);
    (d_row == 0) != (d_col == 0) && board.is_path_clear(from, to)
}

pub fn queen(board: &Board, from: Square, to: Square) -> bool {
    rook(board, from, to) || bishop(board, from, to)
}

/// One step in any direction, or a castling step of two columns.
pub fn king(board: &Board, history: &[Move], color: Color, from: Square, to: Square) -> bool {
    let (d_row, d_col) = deltas(from, to);
    if d_row.abs() <= 1 && d_col.abs() <= 1 {
        return d_row != 0 || d_col != 0;
    }
    d_row == 0 && d_col.abs() == 2 && can_castle(board, history, color, from, to)
}

/// Castling as played here: the king of `color` stands on its back rank and
/// has never moved, a rook of the same color stands on the corner of that
/// rank in the direction of travel, and nothing stands between them.
///
/// The rook is not relocated by the move and attacked squares are ignored.
pub fn can_castle(
    board: &Board,
    history: &[Move],
    color: Color,
    from: Square,
    to: Square,
) -> bool {
    let back_rank = color.back_rank();
    if from.row() != back_rank || to.row() != back_rank {
        return false;
    }
    let king = ColoredPiece::new(Piece::King, color);
    if history.iter().any(|m| m.piece == king) {
        return false;
    }

    let rook_col = if to.col() > from.col() { 7 } else { 0 };
    let Some(rook_sq) = Square::new(back_rank, rook_col) else {
        return false;
    };
    board.piece_at(rook_sq) == Some(ColoredPiece::new(Piece::Rook, color))
        && board.is_path_clear(from, rook_sq)
}
