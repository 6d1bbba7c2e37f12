//! The crate's single error sum type.
//!
//! Per the error-handling policy, most call sites don't need a distinct
//! error variant at all: the validator surfaces a boolean, `execute_move`
//! surfaces a boolean, and [`crate::validator::MatchOutcome`] gives callers
//! who want to distinguish "no match" from "ambiguous match" a richer
//! result without needing an error type for it. Only the two kinds that are
//! genuinely "the input was nonsense" get a variant here.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChessCoreError {
    /// The command string was empty or contained no recognizable grammar.
    ParseFailure { input: String },
    /// The position-description string did not conform to the six-field format.
    MalformedPosition { input: String, reason: String },
}

impl fmt::Display for ChessCoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChessCoreError::ParseFailure { input } => {
                write!(f, "could not parse command: {input:?}")
            }
            ChessCoreError::MalformedPosition { input, reason } => {
                write!(f, "malformed position {input:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for ChessCoreError {}
