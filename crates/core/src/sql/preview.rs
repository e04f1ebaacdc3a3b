//! One-line statement previews for logs.

/// Number of characters kept in a statement preview.
pub const PREVIEW_CHARS: usize = 60;

/// Returns the first `max_chars` characters of `sql` on a single line.
///
/// Line breaks become spaces. An ellipsis is appended when the statement was
/// cut short.
#[must_use]
pub fn preview(sql: &str, max_chars: usize) -> String {
    let mut out: String = sql
        .chars()
        .take(max_chars)
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();

    if sql.chars().nth(max_chars).is_some() {
        out.push_str("...");
    }
    out
}
