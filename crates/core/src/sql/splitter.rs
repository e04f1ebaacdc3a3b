//! Tokenizing statement splitter.
//!
//! The scanner walks the input byte by byte. Every delimiter it cares about
//! is ASCII, and UTF-8 continuation bytes are never ASCII, so slicing at the
//! positions it stops on is always a valid `str` boundary.

use serde::Serialize;

use super::error::SplitError;
use super::preview::{PREVIEW_CHARS, preview};

/// A single executable statement taken from a SQL file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    /// 0-based position among the file's statements.
    pub index: usize,
    /// 1-based line where the statement text starts.
    pub line: usize,
    /// Statement text, without leading comments or the terminating semicolon.
    pub sql: String,
}

impl Statement {
    /// Returns the log preview for this statement.
    #[must_use]
    pub fn preview(&self) -> String {
        preview(&self.sql, PREVIEW_CHARS)
    }
}

/// Splits a SQL script into executable statements.
///
/// Statements end at a top-level `;` or at end of input. Anything that
/// contains only whitespace and comments is dropped, so a comment-only chunk
/// is never sent to the database.
///
/// # Errors
///
/// Returns an error if a string, quoted identifier, dollar-quoted body or
/// block comment is left open at end of input.
pub fn split_statements(input: &str) -> Result<Vec<Statement>, SplitError> {
    let mut scanner = Scanner::new(input);
    scanner.run()?;
    Ok(scanner.statements)
}

struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    /// Byte offset and line of the first significant token of the pending statement.
    start: Option<(usize, usize)>,
    statements: Vec<Statement>,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            start: None,
            statements: Vec::new(),
        }
    }

    fn run(&mut self) -> Result<(), SplitError> {
        while let Some(&b) = self.bytes.get(self.pos) {
            match b {
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                b'-' if self.peek(1) == Some(b'-') => self.skip_line_comment(),
                b'/' if self.peek(1) == Some(b'*') => self.skip_block_comment()?,
                b';' => {
                    self.finish(self.pos);
                    self.pos += 1;
                }
                b'\'' => {
                    self.mark();
                    let backslash_escapes = self.is_escape_string();
                    self.skip_string(backslash_escapes)?;
                }
                b'"' => {
                    self.mark();
                    self.skip_identifier()?;
                }
                b'$' => {
                    self.mark();
                    match self.dollar_tag_len() {
                        Some(tag_len) => self.skip_dollar_body(tag_len)?,
                        None => self.pos += 1,
                    }
                }
                b if b.is_ascii_whitespace() => self.pos += 1,
                _ => {
                    self.mark();
                    self.pos += 1;
                }
            }
        }

        self.finish(self.bytes.len());
        Ok(())
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn mark(&mut self) {
        if self.start.is_none() {
            self.start = Some((self.pos, self.line));
        }
    }

    fn finish(&mut self, end: usize) {
        if let Some((start, line)) = self.start.take() {
            let sql = self.src[start..end].trim_end();
            self.statements.push(Statement {
                index: self.statements.len(),
                line,
                sql: sql.to_string(),
            });
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if b == b'\n' {
                return;
            }
            self.pos += 1;
        }
    }

    /// Postgres block comments nest.
    fn skip_block_comment(&mut self) -> Result<(), SplitError> {
        let open_line = self.line;
        let mut depth = 1usize;
        self.pos += 2;

        loop {
            let Some(&b) = self.bytes.get(self.pos) else {
                return Err(SplitError::UnterminatedComment { line: open_line });
            };
            match b {
                b'*' if self.peek(1) == Some(b'/') => {
                    self.pos += 2;
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                b'/' if self.peek(1) == Some(b'*') => {
                    self.pos += 2;
                    depth += 1;
                }
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                _ => self.pos += 1,
            }
        }
    }

    /// `E'...'` literals, where the `E` is not the tail of a longer word.
    fn is_escape_string(&self) -> bool {
        if self.pos == 0 || !matches!(self.bytes[self.pos - 1], b'E' | b'e') {
            return false;
        }
        self.pos < 2 || !is_ident_byte(self.bytes[self.pos - 2])
    }

    fn skip_string(&mut self, backslash_escapes: bool) -> Result<(), SplitError> {
        let open_line = self.line;
        self.pos += 1;

        loop {
            let Some(&b) = self.bytes.get(self.pos) else {
                return Err(SplitError::UnterminatedString { line: open_line });
            };
            match b {
                b'\\' if backslash_escapes => {
                    if self.peek(1) == Some(b'\n') {
                        self.line += 1;
                    }
                    self.pos += 2;
                }
                b'\'' if self.peek(1) == Some(b'\'') => self.pos += 2,
                b'\'' => {
                    self.pos += 1;
                    return Ok(());
                }
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                _ => self.pos += 1,
            }
        }
    }

    fn skip_identifier(&mut self) -> Result<(), SplitError> {
        let open_line = self.line;
        self.pos += 1;

        loop {
            let Some(&b) = self.bytes.get(self.pos) else {
                return Err(SplitError::UnterminatedIdentifier { line: open_line });
            };
            match b {
                b'"' if self.peek(1) == Some(b'"') => self.pos += 2,
                b'"' => {
                    self.pos += 1;
                    return Ok(());
                }
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                _ => self.pos += 1,
            }
        }
    }

    /// Length of the `$tag$` opener at the current position, if there is one.
    ///
    /// `$1` parameters and `$` inside identifiers are not openers.
    fn dollar_tag_len(&self) -> Option<usize> {
        if self.pos > 0 && is_ident_byte(self.bytes[self.pos - 1]) {
            return None;
        }

        let mut end = self.pos + 1;
        match self.bytes.get(end) {
            Some(b'$') => return Some(2),
            Some(&b) if b.is_ascii_alphabetic() || b == b'_' || b >= 0x80 => {}
            _ => return None,
        }

        while let Some(&b) = self.bytes.get(end) {
            match b {
                b'$' => return Some(end - self.pos + 1),
                b if b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80 => end += 1,
                _ => return None,
            }
        }
        None
    }

    fn skip_dollar_body(&mut self, tag_len: usize) -> Result<(), SplitError> {
        let tag = &self.src[self.pos..self.pos + tag_len];
        let body_start = self.pos + tag_len;

        let Some(offset) = self.src[body_start..].find(tag) else {
            return Err(SplitError::UnterminatedDollarQuote {
                tag: tag.to_string(),
                line: self.line,
            });
        };

        let end = body_start + offset + tag_len;
        self.line += self.bytes[self.pos..end]
            .iter()
            .filter(|&&b| b == b'\n')
            .count();
        self.pos = end;
        Ok(())
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}
