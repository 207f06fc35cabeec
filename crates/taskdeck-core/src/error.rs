//! Error types for parsing domain labels.

use thiserror::Error;

/// A label did not name any variant of the expected enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} '{token}' (expected one of: {expected})")]
pub struct ParseEnumError {
    /// Which kind of value was being parsed.
    pub kind: &'static str,
    /// The rejected input, untrimmed.
    pub token: String,
    /// Comma-separated list of accepted labels.
    pub expected: &'static str,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, token: &str, expected: &'static str) -> Self {
        Self {
            kind,
            token: token.to_owned(),
            expected,
        }
    }
}
