//! Splitter error types.

use thiserror::Error;

/// Errors raised when a SQL file cannot be tokenized.
///
/// Every variant carries the 1-based line where the unterminated construct
/// was opened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    /// A `'...'` or `E'...'` literal never closes.
    #[error("Unterminated string literal starting on line {line}")]
    UnterminatedString {
        /// Opening line.
        line: usize,
    },

    /// A `"..."` identifier never closes.
    #[error("Unterminated quoted identifier starting on line {line}")]
    UnterminatedIdentifier {
        /// Opening line.
        line: usize,
    },

    /// A `$tag$` body has no matching closing tag.
    #[error("Unterminated dollar-quoted string {tag} starting on line {line}")]
    UnterminatedDollarQuote {
        /// The full opening tag, e.g. `$$` or `$body$`.
        tag: String,
        /// Opening line.
        line: usize,
    },

    /// A `/* ... */` comment never closes.
    #[error("Unterminated block comment starting on line {line}")]
    UnterminatedComment {
        /// Opening line.
        line: usize,
    },
}
