//! Error types for decoding and encoding.
//!
//! Decode failures carry the byte offset where the parser stopped; encode
//! failures carry a `$`-rooted path (`$.events[3].start`) to the offending
//! value. Neither direction retries or repairs — a failed call is fatal for
//! that call, and the caller decides what to do next.

use thiserror::Error;

/// Failures while turning JSON text into a value tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input ended in the middle of a value, string, or literal.
    #[error("unexpected end of input at byte {offset}")]
    UnexpectedEndOfInput { offset: usize },

    /// A character that cannot start or continue any valid construct here.
    #[error("unexpected character {found:?} at byte {offset}")]
    UnexpectedToken { offset: usize, found: char },

    /// A malformed backslash escape, including lone or mismatched UTF-16
    /// surrogate halves in `\uXXXX` sequences.
    #[error("invalid escape at byte {offset}: {reason}")]
    InvalidEscape { offset: usize, reason: String },

    /// A digit sequence that violates the JSON number grammar.
    #[error("invalid number {literal:?} at byte {offset}")]
    InvalidNumber { offset: usize, literal: String },

    /// Non-whitespace input remained after the first complete value.
    #[error("trailing characters after top-level value at byte {offset}")]
    TrailingContent { offset: usize },

    /// The input bytes were not valid UTF-8 (only reachable through
    /// [`decode_bytes`](crate::decode_bytes)).
    #[error("invalid UTF-8 sequence at byte {offset}")]
    InvalidUtf8 { offset: usize },

    /// Nesting went past the configured limit before the value closed.
    #[error("nesting deeper than {limit} levels at byte {offset}")]
    DepthExceeded { offset: usize, limit: usize },
}

/// Failures while turning a value tree into JSON text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A container was reached again while still being encoded, i.e. the
    /// tree contains itself.
    #[error("cyclic structure: container at {path} is its own ancestor")]
    CyclicStructure { path: String },

    /// A NaN or infinite float under the fail policy (the default).
    #[error("non-finite number at {path}")]
    NonFiniteNumber { path: String },

    /// Nesting went past the configured limit.
    #[error("nesting deeper than {limit} levels at {path}")]
    DepthExceeded { path: String, limit: usize },
}

/// Convenience alias for decode-side results.
pub type DecodeResult<T> = std::result::Result<T, ParseError>;

/// Convenience alias for encode-side results.
pub type EncodeResult<T> = std::result::Result<T, EncodeError>;
