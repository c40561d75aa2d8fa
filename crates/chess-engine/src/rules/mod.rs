//! Move validation and end-of-game detection.
//!
//! The rule set is deliberately narrow: pieces move by their basic patterns,
//! pawns always promote to a queen, and there is no notion of check. A side
//! is considered checkmated when it has no king or when none of its pieces
//! has a single legal destination.

pub mod pieces;

use chess_core::{Color, ColoredPiece, Move, Square};

use crate::{Board, MoveError};

/// Validates a move for the side `turn` without touching the board.
///
/// Checks run in a fixed order and the first failure is returned:
/// empty source, wrong side, friendly capture, then the piece's own rule.
/// On success the moving piece is returned.
pub fn validate(
    board: &Board,
    history: &[Move],
    turn: Color,
    from: Square,
    to: Square,
) -> Result<ColoredPiece, MoveError> {
    let piece = board.piece_at(from).ok_or(MoveError::NoPieceAtSource)?;

    if piece.color != turn {
        return Err(MoveError::WrongTurn { expected: turn });
    }

    if board.piece_at(to).is_some_and(|target| target.color == piece.color) {
        return Err(MoveError::FriendlyCapture);
    }

    if !pieces::can_move(board, history, piece, from, to) {
        return Err(MoveError::IllegalPieceMove { piece: piece.kind });
    }

    Ok(piece)
}

/// Returns every square the piece on `from` could legally move to if it were
/// its side's turn.
pub fn legal_destinations(board: &Board, history: &[Move], from: Square) -> Vec<Square> {
    let Some(piece) = board.piece_at(from) else {
        return Vec::new();
    };
    Square::all()
        .filter(|&to| validate(board, history, piece.color, from, to).is_ok())
        .collect()
}

/// Returns true if `color` has at least one legal move anywhere on the board.
pub fn has_legal_move(board: &Board, history: &[Move], color: Color) -> bool {
    board.pieces(color).any(|(from, _)| {
        Square::all().any(|to| validate(board, history, color, from, to).is_ok())
    })
}

/// Returns true if `color`, as the side to move, is checkmated.
///
/// A missing king counts as checkmate.
pub fn is_checkmate(board: &Board, history: &[Move], color: Color) -> bool {
    if board.find_king(color).is_none() {
        return true;
    }
    !has_legal_move(board, history, color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Piece;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn validation_order() {
        let b = Board::startpos();
        assert_eq!(
            validate(&b, &[], Color::White, sq("e4"), sq("e5")),
            Err(MoveError::NoPieceAtSource)
        );
        assert_eq!(
            validate(&b, &[], Color::White, sq("e7"), sq("e5")),
            Err(MoveError::WrongTurn {
                expected: Color::White
            })
        );
        assert_eq!(
            validate(&b, &[], Color::White, sq("a1"), sq("a2")),
            Err(MoveError::FriendlyCapture)
        );
        assert_eq!(
            validate(&b, &[], Color::White, sq("a1"), sq("a5")),
            Err(MoveError::IllegalPieceMove { piece: Piece::Rook })
        );
        assert_eq!(
            validate(&b, &[], Color::White, sq("e2"), sq("e4")),
            Ok(ColoredPiece::white(Piece::Pawn))
        );
    }

    #[test]
    fn moving_onto_own_square_is_friendly_capture() {
        let b = Board::startpos();
        assert_eq!(
            validate(&b, &[], Color::White, sq("e1"), sq("e1")),
            Err(MoveError::FriendlyCapture)
        );
    }

    #[test]
    fn startpos_destinations() {
        let b = Board::startpos();
        assert_eq!(
            legal_destinations(&b, &[], sq("g1")),
            vec![sq("f3"), sq("h3")]
        );
        assert_eq!(
            legal_destinations(&b, &[], sq("e7")),
            vec![sq("e6"), sq("e5")]
        );
        assert!(legal_destinations(&b, &[], sq("e1")).is_empty());
        assert!(legal_destinations(&b, &[], sq("e4")).is_empty());
    }

    #[test]
    fn twenty_moves_from_startpos() {
        let b = Board::startpos();
        let total: usize = b
            .pieces(Color::White)
            .map(|(from, _)| legal_destinations(&b, &[], from).len())
            .sum();
        assert_eq!(total, 20);
    }

    #[test]
    fn missing_king_is_checkmate() {
        let b = Board::from_placement("4k3/8/8/8/8/8/8/R7").unwrap();
        assert!(is_checkmate(&b, &[], Color::White));
        assert!(!is_checkmate(&b, &[], Color::Black));
    }

    #[test]
    fn no_legal_move_is_checkmate_even_without_attack() {
        // white king walled in by its own pawns, none of which can move
        let b = Board::from_placement("2PKP3/2PPP3/8/8/8/8/8/k7").unwrap();
        assert!(!has_legal_move(&b, &[], Color::White));
        assert!(is_checkmate(&b, &[], Color::White));
        assert!(!is_checkmate(&b, &[], Color::Black));
    }

    #[test]
    fn any_single_move_prevents_checkmate() {
        // same wall, but the e7 pawn may now capture on f8
        let b = Board::from_placement("2PKPn2/2PPP3/8/8/8/8/8/k7").unwrap();
        assert!(has_legal_move(&b, &[], Color::White));
        assert!(!is_checkmate(&b, &[], Color::White));
    }
}
