//! Command validator: an intent plus the current board resolves to exactly
//! one legal move, or is rejected.
//!
//! Candidate enumeration delegates entirely to [`Board::legal_moves_from`]
//! rather than re-checking piece-specific movement rules itself — the move
//! generator already is the source of truth for what's legal, so the
//! validator's job is purely to narrow the (start, end) search space the
//! command describes and check what survives.

use crate::engine::Board;
use crate::parser::{Action, Command, CommandInfo};
use crate::piece::{Move, PieceKind};
use crate::square::{File, Square};

/// The result of resolving a Move/Capture command against a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Unique(Move),
    None,
    Ambiguous(Vec<Move>),
}

fn squares_on_file(file: File) -> impl Iterator<Item = Square> {
    (0..8u8).map(move |rank| Square::new(file.ix() as u8, rank).unwrap())
}

fn resolve_start_squares(board: &Board, info: Option<CommandInfo>) -> Vec<Square> {
    let side = board.side_to_move();
    match info {
        None => (0..64)
            .map(Square::from_index_unchecked)
            .filter(|&sq| board.piece_at(sq).is_some_and(|p| p.color == side))
            .collect(),
        Some(CommandInfo::Square(sq)) => {
            if board.piece_at(sq).is_some_and(|p| p.color == side) {
                vec![sq]
            } else {
                Vec::new()
            }
        }
        Some(CommandInfo::File(file)) => squares_on_file(file)
            .filter(|&sq| board.piece_at(sq).is_some_and(|p| p.color == side))
            .collect(),
        Some(CommandInfo::Piece(kind)) => board.find_pieces(kind, side),
    }
}

/// `None` means unrestricted (all 64 squares); `Some` is the allowed set.
fn resolve_end_filter(board: &Board, info: Option<CommandInfo>) -> Option<Vec<Square>> {
    match info {
        None => None,
        Some(CommandInfo::Square(sq)) => Some(vec![sq]),
        Some(CommandInfo::File(file)) => Some(squares_on_file(file).collect()),
        Some(CommandInfo::Piece(kind)) => {
            Some(board.find_pieces(kind, board.side_to_move().opponent()))
        }
    }
}

fn is_capture(board: &Board, mv: Move) -> bool {
    board.piece_at(mv.end).is_some() || (mv.kind == PieceKind::Pawn && Some(mv.end) == board.en_passant_target())
}

fn resolve_candidates(board: &Board, command: &Command) -> MatchOutcome {
    let starts = resolve_start_squares(board, command.start);
    let end_filter = resolve_end_filter(board, command.end);
    let wants_capture = command.action == Some(Action::Capture);

    let mut candidates = Vec::new();
    for start in starts {
        for mv in board.legal_moves_from(start) {
            if let Some(allowed) = &end_filter {
                if !allowed.contains(&mv.end) {
                    continue;
                }
            }
            if wants_capture && !is_capture(board, mv) {
                continue;
            }
            candidates.push(mv);
        }
    }

    match candidates.len() {
        0 => MatchOutcome::None,
        1 => MatchOutcome::Unique(candidates[0]),
        _ => MatchOutcome::Ambiguous(candidates),
    }
}

/// Resolve a Move/Capture command into the set of legal moves it could mean.
/// Other action kinds always return [`MatchOutcome::None`]; use [`validate`]
/// for the full action-dispatching boolean check.
pub fn validate_verbose(board: &Board, command: &Command) -> MatchOutcome {
    match command.action {
        Some(Action::Move) | Some(Action::Capture) => resolve_candidates(board, command),
        _ => MatchOutcome::None,
    }
}

fn castling_available(board: &Board, long: bool) -> bool {
    let side = board.side_to_move();
    let king_squares = board.find_pieces(PieceKind::King, side);
    let Some(&king_square) = king_squares.first() else {
        return false;
    };
    board.legal_moves_from(king_square).into_iter().any(|mv| {
        let delta = mv.end.file().ix() as i8 - mv.start.file().ix() as i8;
        if long {
            delta == -2
        } else {
            delta == 2
        }
    })
}

fn can_any_pawn_promote(board: &Board) -> bool {
    let side = board.side_to_move();
    let promotion_rank = side.opponent().back_rank();
    board.find_pieces(PieceKind::Pawn, side).into_iter().any(|square| {
        board
            .legal_moves_from(square)
            .into_iter()
            .any(|mv| mv.end.rank().ix() as u8 == promotion_rank)
    })
}

/// Does `command` resolve to exactly one legal move (or is its action
/// self-sufficient, like Resign)?
pub fn validate(board: &Board, command: &Command) -> bool {
    match command.action {
        Some(Action::Resign) => true,
        Some(Action::ShortCastle) => castling_available(board, false),
        Some(Action::LongCastle) => castling_available(board, true),
        Some(Action::Move) | Some(Action::Capture) => {
            matches!(validate_verbose(board, command), MatchOutcome::Unique(_))
        }
        Some(Action::Promote) => can_any_pawn_promote(board),
        None => false,
    }
}
