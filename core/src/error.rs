//! Error types for tag argument parsing.

use thiserror::Error;

/// Failure while splitting the raw argument string into words.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// A `'` or `"` was opened and never closed.
    #[error("unmatched quote: {0}")]
    UnmatchedQuote(String),
}

/// Errors raised while classifying tag arguments.
///
/// Both classification errors abort the parse of the whole invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// A colon token split into fewer than 2 or more than 3 segments.
    #[error("Unescaped double colon argument.")]
    UnescapedColon,
    /// A `proxy:key:value` token named a known proxy with a sub-key it does
    /// not accept for this tag.
    #[error("Unknown proxy argument.")]
    UnknownProxy,
    /// The raw string could not be tokenized.
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
}

/// Convenience alias for results with [`ArgumentError`].
pub type Result<T> = std::result::Result<T, ArgumentError>;
