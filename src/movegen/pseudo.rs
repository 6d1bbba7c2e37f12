//! Pseudo-legal move generation: per-piece movement patterns that respect
//! occupancy but ignore whether the move leaves the mover's own king in
//! check. Castling is not produced here — see [`super::castling`].

use crate::piece::{Color, Move, Piece, PieceKind};
use crate::position::Position;
use crate::square::Square;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const QUEEN_DIRS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Pseudo-legal moves for the piece sitting on `square`, if any, and if it
/// belongs to the side to move. Empty otherwise.
pub fn pseudo_moves_from(position: &Position, square: Square) -> Vec<Move> {
    let Some(piece) = position.piece_at(square) else {
        return Vec::new();
    };
    if piece.color != position.side_to_move() {
        return Vec::new();
    }

    match piece.kind {
        PieceKind::Pawn => pawn_moves(position, square, piece),
        PieceKind::Knight => leaper_moves(position, square, piece, &KNIGHT_OFFSETS),
        PieceKind::King => leaper_moves(position, square, piece, &KING_OFFSETS),
        PieceKind::Bishop => slider_moves(position, square, piece, &BISHOP_DIRS),
        PieceKind::Rook => slider_moves(position, square, piece, &ROOK_DIRS),
        PieceKind::Queen => slider_moves(position, square, piece, &QUEEN_DIRS),
    }
}

/// All pseudo-legal moves for the side to move.
pub fn all_pseudo_moves(position: &Position) -> Vec<Move> {
    let mut moves = Vec::new();
    for index in 0..64 {
        let square = Square::from_index_unchecked(index);
        if let Some(piece) = position.piece_at(square) {
            if piece.color == position.side_to_move() {
                moves.extend(pseudo_moves_from(position, square));
            }
        }
    }
    moves
}

fn leaper_moves(position: &Position, square: Square, piece: Piece, offsets: &[(i8, i8)]) -> Vec<Move> {
    let mut moves = Vec::new();
    for &(df, dr) in offsets {
        if let Some(target) = square.offset(df, dr) {
            if !occupied_by(position, target, piece.color) {
                moves.push(Move::new(piece.kind, piece.color, square, target));
            }
        }
    }
    moves
}

fn slider_moves(position: &Position, square: Square, piece: Piece, dirs: &[(i8, i8)]) -> Vec<Move> {
    let mut moves = Vec::new();
    for &(df, dr) in dirs {
        let mut current = square;
        while let Some(target) = current.offset(df, dr) {
            current = target;
            match position.piece_at(target) {
                None => moves.push(Move::new(piece.kind, piece.color, square, target)),
                Some(occupant) => {
                    if occupant.color != piece.color {
                        moves.push(Move::new(piece.kind, piece.color, square, target));
                    }
                    break;
                }
            }
        }
    }
    moves
}

fn occupied_by(position: &Position, square: Square, color: Color) -> bool {
    position
        .piece_at(square)
        .is_some_and(|occupant| occupant.color == color)
}

fn pawn_moves(position: &Position, square: Square, piece: Piece) -> Vec<Move> {
    let mut moves = Vec::new();
    let dr = piece.color.pawn_direction();

    if let Some(one_forward) = square.offset(0, dr) {
        if position.piece_at(one_forward).is_none() {
            moves.push(Move::new(piece.kind, piece.color, square, one_forward));

            if square.rank().ix() as u8 == piece.color.pawn_home_rank() {
                if let Some(two_forward) = square.offset(0, dr * 2) {
                    if position.piece_at(two_forward).is_none() {
                        moves.push(Move::new(piece.kind, piece.color, square, two_forward));
                    }
                }
            }
        }
    }

    for df in [-1i8, 1] {
        let Some(target) = square.offset(df, dr) else {
            continue;
        };
        if let Some(occupant) = position.piece_at(target) {
            if occupant.color != piece.color {
                moves.push(Move::new(piece.kind, piece.color, square, target));
            }
        } else if position.en_passant_target() == Some(target) {
            // A diagonal move onto the en-passant target is pseudo-legal
            // even though the square itself is empty.
            moves.push(Move::new(piece.kind, piece.color, square, target));
        }
    }

    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::fen;

    #[test]
    fn pawn_double_push_requires_both_squares_empty() {
        let pos = fen::parse("8/8/8/8/8/4n3/4P3/4K3 w - - 0 1").unwrap();
        let e2 = Square::from_name("e2").unwrap();
        let moves = pseudo_moves_from(&pos, e2);
        // e3 is empty but e4 is occupied by a knight, so only the single push exists.
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].end.name(), "e3");
    }

    #[test]
    fn pawn_double_push_only_from_home_rank() {
        let pos = fen::parse("8/8/8/8/4P3/8/8/4K3 w - - 0 1").unwrap();
        let e4 = Square::from_name("e4").unwrap();
        let moves = pseudo_moves_from(&pos, e4);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].end.name(), "e5");
    }

    #[test]
    fn pawn_diagonal_onto_en_passant_target_is_pseudo_legal() {
        let pos = fen::parse("8/8/8/3Pp3/8/8/8/4K2k w - e6 0 1").unwrap();
        let d5 = Square::from_name("d5").unwrap();
        let moves = pseudo_moves_from(&pos, d5);
        assert!(moves.iter().any(|m| m.end.name() == "e6"));
    }

    #[test]
    fn rook_stops_at_first_occupied_square() {
        let pos = fen::parse("8/8/8/8/3p4/8/3R4/4K3 w - - 0 1").unwrap();
        let d2 = Square::from_name("d2").unwrap();
        let moves = pseudo_moves_from(&pos, d2);
        assert!(moves.iter().any(|m| m.end.name() == "d4"));
        assert!(!moves.iter().any(|m| m.end.name() == "d5"));
    }

    #[test]
    fn knight_cannot_land_on_own_piece() {
        let pos = fen::parse("8/8/8/8/8/5P2/8/4N2K w - - 0 1").unwrap();
        let e1 = Square::from_name("e1").unwrap();
        let moves = pseudo_moves_from(&pos, e1);
        assert!(!moves.iter().any(|m| m.end.name() == "f3"));
    }
}
