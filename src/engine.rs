//! The board engine: owns a mutable [`Position`], exposes the query surface
//! described in `SPEC_FULL.md` §4.7, and is the only thing in this crate
//! that mutates a position.

use std::cell::{Cell, RefCell};

use crate::error::ChessCoreError;
use crate::movegen;
use crate::piece::{CastlingRights, Color, Move, Piece, PieceKind};
use crate::position::{fen, Position};
use crate::square::{File, Square};

/// Why the game ended, when it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    FiftyMoveRule,
    InsufficientMaterial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalState {
    Running,
    Checkmate,
    Stalemate,
    Draw(DrawReason),
}

/// Lazily-built, invalidate-on-mutation cache of each square's legal moves.
#[derive(Debug)]
struct MoveCache {
    dirty: Cell<bool>,
    per_square: RefCell<Option<[Vec<Move>; 64]>>,
}

impl MoveCache {
    fn new() -> Self {
        Self {
            dirty: Cell::new(true),
            per_square: RefCell::new(None),
        }
    }

    fn invalidate(&mut self) {
        self.dirty.set(true);
        *self.per_square.borrow_mut() = None;
    }
}

impl Clone for MoveCache {
    fn clone(&self) -> Self {
        // Caches are rebuilt from scratch on demand; cloning a board must
        // not alias the source board's cached move lists.
        Self::new()
    }
}

/// Owns a chess position and is the sole entry point for mutating it.
#[derive(Debug, Clone)]
pub struct Board {
    position: Position,
    cache: MoveCache,
}

impl Board {
    pub fn new() -> Self {
        Self {
            position: Position::initial(),
            cache: MoveCache::new(),
        }
    }

    pub fn from_serialized(s: &str) -> Result<Self, ChessCoreError> {
        let position = fen::parse(s)?;
        Ok(Self {
            position,
            cache: MoveCache::new(),
        })
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.position.piece_at(square)
    }

    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move()
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.position.castling_rights()
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.position.en_passant_target()
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.position.halfmove_clock()
    }

    pub fn fullmove_number(&self) -> u32 {
        self.position.fullmove_number()
    }

    pub fn find_pieces(&self, kind: PieceKind, color: Color) -> Vec<Square> {
        self.position.find_pieces(kind, color)
    }

    fn ensure_cache(&self) {
        if self.cache.dirty.get() {
            let mut table: [Vec<Move>; 64] = std::array::from_fn(|_| Vec::new());
            for index in 0..64 {
                let square = Square::from_index_unchecked(index);
                table[index] = movegen::legal_moves_from(&self.position, square);
            }
            *self.cache.per_square.borrow_mut() = Some(table);
            self.cache.dirty.set(false);
        }
    }

    pub fn legal_moves_from(&self, square: Square) -> Vec<Move> {
        self.ensure_cache();
        self.cache.per_square.borrow().as_ref().unwrap()[square.index()].clone()
    }

    pub fn all_legal_moves(&self) -> Vec<Move> {
        self.ensure_cache();
        self.cache
            .per_square
            .borrow()
            .as_ref()
            .unwrap()
            .iter()
            .flatten()
            .copied()
            .collect()
    }

    pub fn target_squares_from(&self, square: Square) -> Vec<Square> {
        self.legal_moves_from(square)
            .into_iter()
            .map(|mv| mv.end)
            .collect()
    }

    pub fn is_in_check(&self) -> bool {
        movegen::is_in_check(&self.position, self.position.side_to_move())
    }

    pub fn terminal_state(&self) -> TerminalState {
        if self.all_legal_moves().is_empty() {
            return if self.is_in_check() {
                TerminalState::Checkmate
            } else {
                TerminalState::Stalemate
            };
        }
        if self.position.halfmove_clock() >= 100 {
            return TerminalState::Draw(DrawReason::FiftyMoveRule);
        }
        if insufficient_material(&self.position) {
            return TerminalState::Draw(DrawReason::InsufficientMaterial);
        }
        TerminalState::Running
    }

    /// Apply `mv` if it is legal in the current position and its
    /// piece/color fields match what actually sits on `mv.start`. Returns
    /// `false` (no mutation) otherwise.
    pub fn execute_move(&mut self, mv: Move) -> bool {
        match self.position.piece_at(mv.start) {
            Some(piece) if piece.kind == mv.kind && piece.color == mv.color => {}
            _ => return false,
        }

        if !self.legal_moves_from(mv.start).contains(&mv) {
            return false;
        }

        self.apply(mv);
        self.cache.invalidate();
        true
    }

    fn apply(&mut self, mv: Move) {
        let is_pawn_move = mv.kind == PieceKind::Pawn;
        let is_capture;

        // 1. En-passant: remove the bypassed pawn.
        if is_pawn_move && Some(mv.end) == self.position.en_passant_target() {
            let behind_rank_step = match mv.color {
                Color::White => -1,
                Color::Black => 1,
            };
            if let Some(captured) = mv.end.offset(0, behind_rank_step) {
                self.position.remove(captured);
            }
            is_capture = true;
        } else {
            // 3. Remove any captured piece on the end square (done before
            // step 2's rook relocation so castling, which never captures,
            // is unaffected).
            is_capture = self.position.piece_at(mv.end).is_some();
        }

        // 2. Castling: relocate the rook.
        if mv.kind == PieceKind::King {
            let df = mv.end.file().ix() as i8 - mv.start.file().ix() as i8;
            if df.abs() == 2 {
                let rank = mv.start.rank();
                let (rook_from, rook_to) = if df > 0 {
                    (
                        Square::from_coords(File::H, rank),
                        Square::from_coords(File::F, rank),
                    )
                } else {
                    (
                        Square::from_coords(File::A, rank),
                        Square::from_coords(File::D, rank),
                    )
                };
                self.position.relocate(rook_from, rook_to);
            }
        }

        self.position.remove(mv.end);
        self.position.relocate(mv.start, mv.end);

        // Auto-queen: a pawn landing on the back rank is promoted implicitly.
        if is_pawn_move {
            let back_rank = mv.color.opponent().back_rank();
            if mv.end.rank().ix() as u8 == back_rank {
                self.position.remove(mv.end);
                self.position.place(mv.end, Piece::new(PieceKind::Queen, mv.color));
            }
        }

        // 5. En-passant target for the new position.
        let new_ep_target = if is_pawn_move {
            let delta = mv.end.rank().ix() as i8 - mv.start.rank().ix() as i8;
            if delta.abs() == 2 {
                mv.start.offset(0, delta / 2)
            } else {
                None
            }
        } else {
            None
        };
        self.position.set_en_passant_target(new_ep_target);

        // 6. Castling rights.
        let mut rights = self.position.castling_rights();
        if mv.kind == PieceKind::King {
            rights.clear_color(mv.color);
        }
        rights.clear_corner(mv.start);
        rights.clear_corner(mv.end);
        self.position.set_castling_rights(rights);

        // 7. Halfmove clock.
        if is_pawn_move || is_capture {
            self.position.set_halfmove_clock(0);
        } else {
            self.position.set_halfmove_clock(self.position.halfmove_clock() + 1);
        }

        // 8. Fullmove number increments after Black moves.
        if mv.color == Color::Black {
            self.position.set_fullmove_number(self.position.fullmove_number() + 1);
        }

        // 9. Swap side to move.
        self.position.set_side_to_move(mv.color.opponent());
    }

    pub fn serialize(&self) -> String {
        fen::emit(&self.position)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

fn insufficient_material(position: &Position) -> bool {
    use PieceKind::{Bishop, Knight, Pawn, Queen, Rook};

    // Any queen, rook, or pawn on either side rules out a draw immediately.
    for kind in [Queen, Rook, Pawn] {
        if !position.find_pieces(kind, Color::White).is_empty()
            || !position.find_pieces(kind, Color::Black).is_empty()
        {
            return false;
        }
    }

    let white_knights = position.find_pieces(Knight, Color::White);
    let black_knights = position.find_pieces(Knight, Color::Black);
    let white_bishops = position.find_pieces(Bishop, Color::White);
    let black_bishops = position.find_pieces(Bishop, Color::Black);

    let white_minors = white_knights.len() + white_bishops.len();
    let black_minors = black_knights.len() + black_bishops.len();

    match (white_minors, black_minors) {
        (0, 0) => true,
        (1, 0) | (0, 1) => true,
        (1, 1) => {
            // Only same-colored bishops draw here; knight+knight,
            // knight+bishop, and opposite-colored bishops do not.
            white_bishops.len() == 1
                && black_bishops.len() == 1
                && white_bishops[0].is_light() == black_bishops[0].is_light()
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceKind;

    #[test]
    fn opening_double_push_sets_en_passant_and_swaps_side() {
        let mut board = Board::new();
        let e2 = Square::from_name("e2").unwrap();
        let e4 = Square::from_name("e4").unwrap();
        let mv = Move::new(PieceKind::Pawn, Color::White, e2, e4);
        assert!(board.execute_move(mv));
        assert_eq!(board.piece_at(e4).unwrap().kind, PieceKind::Pawn);
        assert!(board.piece_at(e2).is_none());
        assert_eq!(board.en_passant_target(), Some(Square::from_name("e3").unwrap()));
        assert_eq!(board.side_to_move(), Color::Black);
    }

    #[test]
    fn en_passant_capture_removes_bypassed_pawn() {
        let mut board = Board::from_serialized("8/8/8/3Pp3/8/8/8/4K2k w - e6 0 1").unwrap();
        let d5 = Square::from_name("d5").unwrap();
        let e6 = Square::from_name("e6").unwrap();
        let mv = Move::new(PieceKind::Pawn, Color::White, d5, e6);
        assert!(board.execute_move(mv));
        assert_eq!(board.piece_at(e6).unwrap().kind, PieceKind::Pawn);
        assert!(board.piece_at(Square::from_name("e5").unwrap()).is_none());
    }

    #[test]
    fn kingside_castle_relocates_rook_and_clears_rights() {
        let mut board =
            Board::from_serialized("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let e1 = Square::from_name("e1").unwrap();
        let g1 = Square::from_name("g1").unwrap();
        let mv = Move::new(PieceKind::King, Color::White, e1, g1);
        assert!(board.execute_move(mv));
        assert_eq!(board.piece_at(g1).unwrap().kind, PieceKind::King);
        assert_eq!(
            board.piece_at(Square::from_name("f1").unwrap()).unwrap().kind,
            PieceKind::Rook
        );
        assert!(board.piece_at(e1).is_none());
        assert!(board.piece_at(Square::from_name("h1").unwrap()).is_none());
        assert!(!board.castling_rights().white_kingside);
        assert!(!board.castling_rights().white_queenside);
    }

    #[test]
    fn no_castling_through_check() {
        let board =
            Board::from_serialized("r3k2r/pppp1ppp/8/4r3/8/8/PPPP1PPP/R3K2R w KQkq - 0 1").unwrap();
        let e1 = Square::from_name("e1").unwrap();
        let targets = board.target_squares_from(e1);
        assert!(!targets.iter().any(|s| s.name() == "g1"));
        assert!(!targets.iter().any(|s| s.name() == "c1"));
    }

    #[test]
    fn pawn_promotes_to_queen_automatically() {
        let mut board = Board::from_serialized("8/4P3/8/8/8/8/8/4K2k w - - 0 1").unwrap();
        let e7 = Square::from_name("e7").unwrap();
        let e8 = Square::from_name("e8").unwrap();
        let mv = Move::new(PieceKind::Pawn, Color::White, e7, e8);
        assert!(board.execute_move(mv));
        assert_eq!(board.piece_at(e8).unwrap().kind, PieceKind::Queen);
    }

    #[test]
    fn execute_move_rejects_mismatched_piece() {
        let mut board = Board::new();
        let e2 = Square::from_name("e2").unwrap();
        let e4 = Square::from_name("e4").unwrap();
        // There's a pawn on e2, not a knight.
        let bogus = Move::new(PieceKind::Knight, Color::White, e2, e4);
        assert!(!board.execute_move(bogus));
    }

    #[test]
    fn insufficient_material_king_vs_king() {
        let board = Board::from_serialized("8/8/4k3/8/8/3K4/8/8 w - - 0 1").unwrap();
        assert_eq!(
            board.terminal_state(),
            TerminalState::Draw(DrawReason::InsufficientMaterial)
        );
    }

    #[test]
    fn king_and_knight_vs_king_is_insufficient() {
        let board = Board::from_serialized("8/8/4k3/8/8/3KN3/8/8 w - - 0 1").unwrap();
        assert_eq!(
            board.terminal_state(),
            TerminalState::Draw(DrawReason::InsufficientMaterial)
        );
    }

    #[test]
    fn same_colored_bishops_are_insufficient_material() {
        // Both bishops on dark squares.
        let board = Board::from_serialized("8/8/4k3/8/8/3KB3/7b/8 w - - 0 1").unwrap();
        assert_eq!(
            board.terminal_state(),
            TerminalState::Draw(DrawReason::InsufficientMaterial)
        );
    }

    #[test]
    fn opposite_colored_bishops_are_not_insufficient_material() {
        let board = Board::from_serialized("8/8/4k3/8/8/3KB3/6b1/8 w - - 0 1").unwrap();
        assert_ne!(
            board.terminal_state(),
            TerminalState::Draw(DrawReason::InsufficientMaterial)
        );
    }

    #[test]
    fn fifty_move_rule_draw() {
        let board = Board::from_serialized("8/8/4k3/8/8/3K4/8/7r b - - 100 60").unwrap();
        assert_eq!(
            board.terminal_state(),
            TerminalState::Draw(DrawReason::FiftyMoveRule)
        );
    }

    #[test]
    fn checkmate_sets_terminal_state() {
        let board = Board::from_serialized("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert_eq!(board.terminal_state(), TerminalState::Checkmate);
        assert!(board.is_in_check());
        assert!(board.all_legal_moves().is_empty());
    }

    #[test]
    fn stalemate_sets_terminal_state() {
        // Black king on a8, boxed in by white king and queen, not in check.
        let board = Board::from_serialized("k7/2Q5/1K6/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(board.terminal_state(), TerminalState::Stalemate);
        assert!(!board.is_in_check());
        assert!(board.all_legal_moves().is_empty());
    }

    #[test]
    fn clone_rebuilds_cache_independently() {
        let mut board = Board::new();
        // Warm the cache.
        let _ = board.all_legal_moves();
        let clone = board.clone();
        let e2 = Square::from_name("e2").unwrap();
        let e4 = Square::from_name("e4").unwrap();
        board.execute_move(Move::new(PieceKind::Pawn, Color::White, e2, e4));
        // The clone must not have observed the mutation to `board`.
        assert!(clone.piece_at(e2).is_some());
    }
}
