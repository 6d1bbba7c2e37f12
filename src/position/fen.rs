//! Parse and emit the standard six-field position-description format (see
//! `SPEC_FULL.md` §6): board / side to move / castling rights / en-passant
//! target / halfmove clock / fullmove number.
//!
//! Grammar is expressed with `chumsky` the way the rest of this crate's
//! grounding corpus expresses notation grammars, rather than hand-rolled
//! index scanning.

use chumsky::extra;
use chumsky::prelude::*;

use crate::error::ChessCoreError;
use crate::piece::{CastlingRights, Color, Piece};
use crate::square::Square;

use super::Position;

/// Error-reporting extra used by every parser in this module.
type PErr<'s> = extra::Err<Rich<'s, char>>;

fn rank_descriptor<'s>() -> impl Parser<'s, &'s str, Vec<Option<Piece>>, PErr<'s>> {
    choice((
        one_of('1'..='8').map(|c: char| {
            let n = c.to_digit(10).unwrap() as usize;
            vec![None; n]
        }),
        any().try_map(|c: char, span| {
            Piece::from_fen_char(c)
                .map(|p| vec![Some(p)])
                .ok_or_else(|| Rich::custom(span, format!("'{c}' is not a piece letter")))
        }),
    ))
    .repeated()
    .at_least(1)
    .collect::<Vec<_>>()
    .map(|runs| runs.into_iter().flatten().collect())
}

fn board_parser<'s>() -> impl Parser<'s, &'s str, [Option<Piece>; 64], PErr<'s>> {
    rank_descriptor()
        .separated_by(just('/'))
        .exactly(8)
        .collect::<Vec<_>>()
        .try_map(|ranks, span| {
            let mut squares = [None; 64];
            // Rank descriptors are written rank 8 first, descending.
            for (i, rank_squares) in ranks.into_iter().enumerate() {
                if rank_squares.len() != 8 {
                    return Err(Rich::custom(span, "rank does not sum to 8 squares"));
                }
                let rank_index = 7 - i;
                for (file_index, piece) in rank_squares.into_iter().enumerate() {
                    squares[rank_index * 8 + file_index] = piece;
                }
            }
            Ok(squares)
        })
}

fn color_parser<'s>() -> impl Parser<'s, &'s str, Color, PErr<'s>> {
    choice((just('w').to(Color::White), just('b').to(Color::Black)))
}

fn castling_parser<'s>() -> impl Parser<'s, &'s str, CastlingRights, PErr<'s>> {
    none_of(" ")
        .repeated()
        .at_least(1)
        .collect::<String>()
        .map(|s| CastlingRights::from_fen(&s))
}

fn en_passant_parser<'s>() -> impl Parser<'s, &'s str, Option<Square>, PErr<'s>> {
    choice((
        just('-').to(None),
        one_of('a'..='h')
            .then(one_of('1'..='8'))
            .try_map(|(f, r), span| {
                Square::from_name(&format!("{f}{r}"))
                    .map(Some)
                    .ok_or_else(|| Rich::custom(span, "invalid en-passant square"))
            }),
    ))
}

fn uint_parser<'s>() -> impl Parser<'s, &'s str, u32, PErr<'s>> {
    text::int(10).try_map(|s: &str, span| {
        s.parse::<u32>()
            .map_err(|_| Rich::custom(span, "expected a non-negative integer"))
    })
}

fn position_parser<'s>() -> impl Parser<'s, &'s str, Position, PErr<'s>> {
    board_parser()
        .then_ignore(just(' '))
        .then(color_parser())
        .then_ignore(just(' '))
        .then(castling_parser())
        .then_ignore(just(' '))
        .then(en_passant_parser())
        .then(
            just(' ')
                .ignore_then(uint_parser())
                .then_ignore(just(' '))
                .then(uint_parser())
                .or_not(),
        )
        .map(|((((squares, color), rights), ep), clocks)| {
            let (halfmove, fullmove) = clocks.unwrap_or((0, 1));
            let mut position = Position::empty();
            for (index, piece) in squares.into_iter().enumerate() {
                if let Some(piece) = piece {
                    position.place(Square::from_index_unchecked(index), piece);
                }
            }
            position.set_side_to_move(color);
            position.set_castling_rights(rights);
            position.set_en_passant_target(ep);
            position.set_halfmove_clock(halfmove);
            position.set_fullmove_number(fullmove);
            position
        })
}

/// Parse a position-description string. Missing trailing clock fields
/// default to halfmove=0, fullmove=1.
pub fn parse(input: &str) -> Result<Position, ChessCoreError> {
    position_parser()
        .then_ignore(end())
        .parse(input.trim())
        .into_result()
        .map_err(|errs| ChessCoreError::MalformedPosition {
            input: input.to_string(),
            reason: errs
                .into_iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; "),
        })
}

/// Emit the position in the six-field format. Always produces all six
/// fields, even if the position was parsed from a string missing the
/// trailing clocks.
pub fn emit(position: &Position) -> String {
    let mut ranks = Vec::with_capacity(8);
    for rank_index in (0..8).rev() {
        let mut descriptor = String::new();
        let mut empty_run = 0u32;
        for file_index in 0..8 {
            let square = Square::from_index_unchecked(rank_index * 8 + file_index);
            match position.piece_at(square) {
                Some(piece) => {
                    if empty_run > 0 {
                        descriptor.push_str(&empty_run.to_string());
                        empty_run = 0;
                    }
                    descriptor.push(piece.to_fen_char());
                }
                None => empty_run += 1,
            }
        }
        if empty_run > 0 {
            descriptor.push_str(&empty_run.to_string());
        }
        ranks.push(descriptor);
    }

    let board = ranks.join("/");
    let color = match position.side_to_move() {
        Color::White => "w",
        Color::Black => "b",
    };
    let castling = position.castling_rights().to_fen();
    let en_passant = position
        .en_passant_target()
        .map(|s| s.name().to_string())
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{board} {color} {castling} {en_passant} {} {}",
        position.halfmove_clock(),
        position.fullmove_number()
    )
}
