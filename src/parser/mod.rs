//! Command parser: free-form utterance in, structured [`Command`] out.
//!
//! Three stages, run in order: regex-based preprocessing (§4.8 step 1-3),
//! a top-level dispatch for the fixed-vocabulary commands (castle, resign,
//! promote), and a tokenizer + intent-assembly pass for everything else.

pub mod token;

use std::sync::LazyLock;

use regex::Regex;
use trie_rs::{Trie, TrieBuilder};

use crate::error::ChessCoreError;
use crate::piece::PieceKind;
use crate::square::{File, Square};

pub use token::{Action, Command, CommandInfo};
use token::Token;

fn vocabulary(words: &[&str]) -> Trie<u8> {
    let mut builder = TrieBuilder::new();
    for word in words {
        builder.push(*word);
    }
    builder.build()
}

static PIECE_WORDS: LazyLock<Trie<u8>> =
    LazyLock::new(|| vocabulary(&["king", "queen", "rook", "bishop", "knight", "night", "pawn"]));

static CAPTURE_WORDS: LazyLock<Trie<u8>> =
    LazyLock::new(|| vocabulary(&["takes", "captures", "capture", "x"]));

static MOVE_WORDS: LazyLock<Trie<u8>> = LazyLock::new(|| vocabulary(&["to", "moves", "move"]));

static DIGIT_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(one|two|three|four|five|six|seven|eight)\b").unwrap());

static MERGE_SQUARE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-h]?[a-h])\s+([1-8])").unwrap());

static CASTLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bcastl(e|es|ing)?\b").unwrap());

const LONG_MARKERS: [&str; 4] = ["long", "queenside", "queen side", "queen-side"];

fn digit_for_word(word: &str) -> &'static str {
    match word {
        "one" => "1",
        "two" => "2",
        "three" => "3",
        "four" => "4",
        "five" => "5",
        "six" => "6",
        "seven" => "7",
        "eight" => "8",
        _ => unreachable!("regex only matches the words listed above"),
    }
}

/// Lowercase, trim, spell out spoken digits, and merge separated
/// file+rank pairs into square tokens (§4.8 steps 1-3).
fn preprocess(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let digits_applied = DIGIT_WORD_RE.replace_all(&lowered, |caps: &regex::Captures| {
        digit_for_word(&caps[0]).to_string()
    });
    MERGE_SQUARE_RE
        .replace_all(&digits_applied, "$1$2")
        .into_owned()
}

fn piece_kind_from_word(word: &str) -> Option<PieceKind> {
    if !PIECE_WORDS.exact_match(word) {
        return None;
    }
    Some(match word {
        "king" => PieceKind::King,
        "queen" => PieceKind::Queen,
        "rook" => PieceKind::Rook,
        "bishop" => PieceKind::Bishop,
        "knight" | "night" => PieceKind::Knight,
        "pawn" => PieceKind::Pawn,
        _ => unreachable!("trie only contains the words matched above"),
    })
}

/// Classify one whitespace-delimited word into zero, one, or two tokens
/// (the length-3 `file+square` case expands into two).
fn classify_word(word: &str) -> Vec<Token> {
    if let Some(kind) = piece_kind_from_word(word) {
        return vec![Token::Info(CommandInfo::Piece(kind))];
    }
    if CAPTURE_WORDS.exact_match(word) {
        return vec![Token::Act(Action::Capture)];
    }
    if MOVE_WORDS.exact_match(word) {
        return vec![Token::Act(Action::Move)];
    }
    if word.chars().count() == 2 {
        if let Some(square) = Square::from_name(word) {
            return vec![Token::Info(CommandInfo::Square(square))];
        }
    }
    if word.chars().count() == 1 {
        if let Some(file) = File::from_char(word.chars().next().unwrap()) {
            return vec![Token::Info(CommandInfo::File(file))];
        }
    }
    if word.chars().count() == 3 {
        let mut chars = word.chars();
        let first = chars.next().unwrap();
        let rest: String = chars.collect();
        if let (Some(file), Some(square)) = (File::from_char(first), Square::from_name(&rest)) {
            return vec![
                Token::Info(CommandInfo::File(file)),
                Token::Info(CommandInfo::Square(square)),
            ];
        }
    }
    Vec::new()
}

fn tokenize(preprocessed: &str) -> Vec<Token> {
    preprocessed.split_whitespace().flat_map(classify_word).collect()
}

/// Pick the single `CommandInfo` a token group contributes, preferring
/// piece over square over file.
fn extract_command_info(tokens: &[Token]) -> Option<CommandInfo> {
    let infos: Vec<CommandInfo> = tokens
        .iter()
        .filter_map(|t| match t {
            Token::Info(info) => Some(*info),
            Token::Act(_) => None,
        })
        .collect();

    infos
        .iter()
        .find(|i| matches!(i, CommandInfo::Piece(_)))
        .or_else(|| infos.iter().find(|i| matches!(i, CommandInfo::Square(_))))
        .or_else(|| infos.iter().find(|i| matches!(i, CommandInfo::File(_))))
        .copied()
}

fn assemble(tokens: Vec<Token>) -> Command {
    if let Some(action_ix) = tokens.iter().position(|t| matches!(t, Token::Act(_))) {
        let Token::Act(action) = tokens[action_ix] else {
            unreachable!()
        };
        let start = extract_command_info(&tokens[..action_ix]);
        let end = extract_command_info(&tokens[action_ix + 1..]);
        return Command::new(start, Some(action), end);
    }

    // Implicit Move: match the token-group shapes named in §4.8, falling
    // back to "last token is the end, everything before it condenses into
    // the start" otherwise.
    let infos: Vec<CommandInfo> = tokens
        .iter()
        .map(|t| match t {
            Token::Info(info) => *info,
            Token::Act(_) => unreachable!("no Act tokens remain on this branch"),
        })
        .collect();

    if infos.is_empty() {
        return Command::empty_fallback();
    }

    match infos.as_slice() {
        [CommandInfo::Square(sq)] => Command::new(None, Some(Action::Move), Some(CommandInfo::Square(*sq))),
        [CommandInfo::File(file), CommandInfo::Square(sq)] => Command::new(
            Some(CommandInfo::File(*file)),
            Some(Action::Move),
            Some(CommandInfo::Square(*sq)),
        ),
        [CommandInfo::Piece(kind), CommandInfo::Square(sq)] => Command::new(
            Some(CommandInfo::Piece(*kind)),
            Some(Action::Move),
            Some(CommandInfo::Square(*sq)),
        ),
        [CommandInfo::Square(from), CommandInfo::Square(to)] => Command::new(
            Some(CommandInfo::Square(*from)),
            Some(Action::Move),
            Some(CommandInfo::Square(*to)),
        ),
        _ => {
            let (last, rest) = infos.split_last().expect("checked non-empty above");
            let end = Some(*last);
            let rest_tokens: Vec<Token> = rest.iter().map(|i| Token::Info(*i)).collect();
            let start = extract_command_info(&rest_tokens);
            Command::new(start, Some(Action::Move), end)
        }
    }
}

/// Parse a single transcribed utterance into a [`Command`]. Fails hard on
/// empty or entirely-unintelligible input.
pub fn parse_command(input: &str) -> Result<Command, ChessCoreError> {
    let preprocessed = preprocess(input);
    if preprocessed.is_empty() {
        return Err(ChessCoreError::ParseFailure {
            input: input.to_string(),
        });
    }

    if CASTLE_RE.is_match(&preprocessed) {
        let long = LONG_MARKERS.iter().any(|marker| preprocessed.contains(marker));
        let action = if long { Action::LongCastle } else { Action::ShortCastle };
        return Ok(Command::new(None, Some(action), None));
    }

    if preprocessed == "resign" || preprocessed == "i resign" {
        return Ok(Command::new(None, Some(Action::Resign), None));
    }

    if preprocessed == "promote" || preprocessed == "pawn promote" || preprocessed == "promote pawn" {
        return Ok(Command::new(None, Some(Action::Promote), None));
    }

    Ok(assemble(tokenize(&preprocessed)))
}

/// Same grammar as [`parse_command`], but never fails: empty or
/// unintelligible input produces the degenerate fallback `Command` (a bare
/// Move with no descriptors), which the validator is guaranteed to reject.
pub fn parse_command_lenient(input: &str) -> Command {
    parse_command(input).unwrap_or_else(|_| Command::empty_fallback())
}
