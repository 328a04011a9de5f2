//! Shared rules for statement lines: whitespace, dates, amounts.

pub mod amounts;
pub mod dates;
pub mod patterns;

pub use amounts::{find_marked_amounts, find_plain_amounts, parse_amount, AmountToken, EntryMarker};
pub use dates::DateFormat;

use patterns::WHITESPACE_RUN;

/// Collapse whitespace runs to single spaces and trim.
pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE_RUN.replace_all(s.trim(), " ").into_owned()
}

/// Leading date of a line, split from the rest of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatedLine<'a> {
    pub date: chrono::NaiveDate,
    /// The date token as written.
    pub date_token: &'a str,
    /// Everything after the date token, leading space included.
    pub body: &'a str,
    pub token_count: usize,
}

/// Match the first token of a normalized line against a date format.
///
/// Returns `None` when the line has fewer than `min_tokens` tokens or the
/// first token is not a valid date in `format`.
pub fn split_dated_line(line: &str, format: DateFormat, min_tokens: usize) -> Option<DatedLine<'_>> {
    let token_count = line.split(' ').count();
    if token_count < min_tokens {
        return None;
    }

    let date_token = line.split(' ').next()?;
    let date = format.parse(date_token)?;

    Some(DatedLine {
        date,
        date_token,
        body: &line[date_token.len()..],
        token_count,
    })
}
