//! The legality filter: a pseudo-legal move is legal iff, after applying it
//! hypothetically, the mover's own king is not attacked.
//!
//! Implemented as apply-test-revert on an owned scratch [`Position`] clone,
//! which is simpler than an overlay and cheap enough given the bounded
//! (<=64 square) state being copied.

use crate::piece::{Color, Move, PieceKind};
use crate::position::Position;
use crate::square::Square;

use super::attacks::is_attacked;

/// Would `mv` leave `mv.color`'s own king attacked, if applied to `position`?
///
/// This only simulates piece movement (including en-passant capture and
/// castling rook relocation) for the purpose of the check test; it does not
/// touch castling rights, clocks, or side to move.
pub fn leaves_own_king_attacked(position: &Position, mv: Move) -> bool {
    let mut scratch = position.clone();
    apply_hypothetically(&mut scratch, mv);
    let king_square = scratch.king_square(mv.color);
    is_attacked(&scratch, king_square, mv.color.opponent())
}

fn apply_hypothetically(position: &mut Position, mv: Move) {
    if mv.kind == PieceKind::Pawn && Some(mv.end) == position.en_passant_target() {
        let captured_rank_step = match mv.color {
            Color::White => -1,
            Color::Black => 1,
        };
        if let Some(captured_square) = mv.end.offset(0, captured_rank_step) {
            position.remove(captured_square);
        }
    }

    if mv.kind == PieceKind::King {
        let df = mv.end.file().ix() as i8 - mv.start.file().ix() as i8;
        if df.abs() == 2 {
            let rank = mv.start.rank();
            let (rook_from, rook_to) = if df > 0 {
                (
                    Square::from_coords(crate::square::File::H, rank),
                    Square::from_coords(crate::square::File::F, rank),
                )
            } else {
                (
                    Square::from_coords(crate::square::File::A, rank),
                    Square::from_coords(crate::square::File::D, rank),
                )
            };
            position.relocate(rook_from, rook_to);
        }
    }

    position.remove(mv.end);
    position.relocate(mv.start, mv.end);
}

/// Filter a list of pseudo-legal moves down to legal ones.
pub fn filter_legal(position: &Position, moves: Vec<Move>) -> Vec<Move> {
    moves
        .into_iter()
        .filter(|&mv| !leaves_own_king_attacked(position, mv))
        .collect()
}
