//! Attack detection: is a square attacked by a given color, independent of
//! whose turn it is. Shared by the legality filter and the castling helper.

use crate::piece::{Color, PieceKind};
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

/// Does any piece of `attacker` attack `target` on this position?
pub fn is_attacked(position: &Position, target: Square, attacker: Color) -> bool {
    for (df, dr) in KNIGHT_OFFSETS {
        if let Some(sq) = target.offset(df, dr) {
            if let Some(piece) = position.piece_at(sq) {
                if piece.color == attacker && piece.kind == PieceKind::Knight {
                    return true;
                }
            }
        }
    }

    for (df, dr) in KING_OFFSETS {
        if let Some(sq) = target.offset(df, dr) {
            if let Some(piece) = position.piece_at(sq) {
                if piece.color == attacker && piece.kind == PieceKind::King {
                    return true;
                }
            }
        }
    }

    // A pawn attacks diagonally forward from the attacker's point of view;
    // so to find an attacking pawn we look one step *backward* from the
    // target, in the attacker's advancing direction.
    let pawn_dr = attacker.pawn_direction();
    for df in [-1i8, 1] {
        if let Some(sq) = target.offset(df, -pawn_dr) {
            if let Some(piece) = position.piece_at(sq) {
                if piece.color == attacker && piece.kind == PieceKind::Pawn {
                    return true;
                }
            }
        }
    }

    if ray_attacks(position, target, attacker, &BISHOP_DIRS, PieceKind::Bishop) {
        return true;
    }
    if ray_attacks(position, target, attacker, &ROOK_DIRS, PieceKind::Rook) {
        return true;
    }

    false
}

fn ray_attacks(
    position: &Position,
    target: Square,
    attacker: Color,
    dirs: &[(i8, i8); 4],
    slider_kind: PieceKind,
) -> bool {
    for &(df, dr) in dirs {
        let mut current = target;
        while let Some(next) = current.offset(df, dr) {
            current = next;
            match position.piece_at(current) {
                None => continue,
                Some(piece) => {
                    if piece.color == attacker
                        && (piece.kind == slider_kind || piece.kind == PieceKind::Queen)
                    {
                        return true;
                    }
                    break;
                }
            }
        }
    }
    false
}
