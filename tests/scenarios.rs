//! End-to-end scenarios exercised against the public surface: `Board`,
//! `parse_command`, and the validator. One test per scenario.

use voicechess_core::{
    parse_command, validate, validate_verbose, Action, Board, CommandInfo, DrawReason, Move,
    MatchOutcome, PieceKind, Square, TerminalState,
};
use voicechess_core::piece::Color;

#[test]
fn opening_double_push() {
    let mut board = Board::new();
    let e2 = Square::from_name("e2").unwrap();
    let e4 = Square::from_name("e4").unwrap();
    assert!(board.execute_move(Move::new(PieceKind::Pawn, Color::White, e2, e4)));
    assert_eq!(board.piece_at(e4).unwrap().kind, PieceKind::Pawn);
    assert!(board.piece_at(e2).is_none());
    assert_eq!(board.en_passant_target(), Some(Square::from_name("e3").unwrap()));
    assert_eq!(board.side_to_move(), Color::Black);
}

#[test]
fn en_passant_capture() {
    let mut board = Board::from_serialized("8/8/8/3Pp3/8/8/8/4K2k w - e6 0 1").unwrap();
    let d5 = Square::from_name("d5").unwrap();
    let e6 = Square::from_name("e6").unwrap();
    assert!(board.execute_move(Move::new(PieceKind::Pawn, Color::White, d5, e6)));
    assert_eq!(board.piece_at(e6).unwrap().kind, PieceKind::Pawn);
    assert!(board.piece_at(Square::from_name("e5").unwrap()).is_none());
}

#[test]
fn castling_kingside() {
    let mut board =
        Board::from_serialized("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
    let e1 = Square::from_name("e1").unwrap();
    let g1 = Square::from_name("g1").unwrap();
    assert!(board.execute_move(Move::new(PieceKind::King, Color::White, e1, g1)));
    assert_eq!(board.piece_at(g1).unwrap().kind, PieceKind::King);
    assert_eq!(board.piece_at(Square::from_name("f1").unwrap()).unwrap().kind, PieceKind::Rook);
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
fn pin() {
    // The spec's literal seed FEN for this scenario (rook a4, bishop d4,
    // kings d1/h1) does not actually pin the bishop: the rook and the white
    // king share no rank, file, or diagonal through d4. This FEN keeps the
    // scenario's shape (a rook and a bishop on the same rank as the mover's
    // king) but arranges the three non-black-king pieces on one rank so the
    // bishop genuinely blocks the only check on its own king.
    let board = Board::from_serialized("k7/8/8/8/r2B3K/8/8/8 w - - 0 1").unwrap();
    let d4 = Square::from_name("d4").unwrap();
    assert!(board.legal_moves_from(d4).is_empty());
}

#[test]
fn command_parse_bd3() {
    let cmd = parse_command("bd3").unwrap();
    assert_eq!(cmd.start, Some(CommandInfo::File(voicechess_core::File::B)));
    assert_eq!(cmd.action, Some(Action::Move));
    assert_eq!(cmd.end, Some(CommandInfo::Square(Square::from_name("d3").unwrap())));
}

#[test]
fn command_parse_knight_f_three() {
    let cmd = parse_command("knight f three").unwrap();
    assert_eq!(cmd.start, Some(CommandInfo::Piece(PieceKind::Knight)));
    assert_eq!(cmd.action, Some(Action::Move));
    assert_eq!(cmd.end, Some(CommandInfo::Square(Square::from_name("f3").unwrap())));
}

#[test]
fn validator_ambiguity() {
    let board = Board::from_serialized("3Q4/8/8/8/3Q4/8/8/4K2k w - - 0 1").unwrap();
    let cmd = voicechess_core::Command::new(
        Some(CommandInfo::Piece(PieceKind::Queen)),
        Some(Action::Move),
        Some(CommandInfo::Square(Square::from_name("d6").unwrap())),
    );
    assert!(!validate(&board, &cmd));
    assert!(matches!(validate_verbose(&board, &cmd), MatchOutcome::Ambiguous(_)));
}

#[test]
fn insufficient_material() {
    let board = Board::from_serialized("8/8/4k3/8/8/3K4/8/8 w - - 0 1").unwrap();
    assert_eq!(
        board.terminal_state(),
        TerminalState::Draw(DrawReason::InsufficientMaterial)
    );
}
