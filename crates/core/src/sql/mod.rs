//! SQL statement splitting.
//!
//! Migration files are split into statements so each one can be executed and
//! reported on its own. The splitter is a small tokenizer rather than a
//! regex: semicolons inside string literals, quoted identifiers, dollar-quoted
//! bodies and comments never end a statement.

pub mod error;
pub mod preview;
pub mod splitter;

#[cfg(test)]
mod splitter_props;
#[cfg(test)]
mod tests;

pub use error::SplitError;
pub use preview::{PREVIEW_CHARS, preview};
pub use splitter::{Statement, split_statements};
