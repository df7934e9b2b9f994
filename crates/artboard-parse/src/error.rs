//! Error types for the lexing, parsing, and interpretation layers.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Non-fatal conditions
//! are reported as [`artboard_core::Warning`]s instead.

use thiserror::Error;

/// Fatal error raised while parsing or interpreting a content stream.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Malformed token or operand nesting: mismatched brackets, a non-Name
    /// dictionary key, an unparseable number. Aborts the current parse.
    #[error("structural error: {0}")]
    Structural(String),

    /// An interpreter invariant was violated: empty graphics stack, marked
    /// context pop without a push, text shown with no font. Fatal for the
    /// artboard being parsed; sibling parses are unaffected.
    #[error("assertion failed: {0}")]
    Assertion(String),

    /// Font or encoding resolution failed.
    #[error("font error: {0}")]
    Font(String),

    /// The injected stream fetcher failed to deliver an object's bytes.
    #[error("stream fetch failed: {0}")]
    Fetch(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_error_message() {
        let err = ParseError::Structural("dict key is not a Name".to_string());
        assert_eq!(err.to_string(), "structural error: dict key is not a Name");
    }

    #[test]
    fn assertion_error_message() {
        let err = ParseError::Assertion("empty graphics stack".to_string());
        assert_eq!(err.to_string(), "assertion failed: empty graphics stack");
    }

    #[test]
    fn implements_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(ParseError::Fetch("object 12".to_string()));
        assert!(err.to_string().contains("object 12"));
    }
}
