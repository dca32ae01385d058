//! Header binding and numeric coercion on top of the tokenizer.

use crate::error::{ParseError, RowWidthMismatch};

use super::clean::{DEFAULT_COMMENT_CHAR, clean};
use super::tokenizer::tokenize;
use super::value::{FieldValue, Row};

/// Sentinel used by survey exports for "no answer".
pub const DEFAULT_MISSING_SENTINEL: &str = ".";

/// Options for [`parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Lines whose trimmed form starts with this character are dropped.
    pub comment_char: char,
    /// Turn numeric-looking fields into [`FieldValue::Number`].
    pub convert_numbers: bool,
    /// Values that are never coerced to numbers, even if they would parse.
    pub missing_sentinels: Vec<String>,
    /// Refuse inputs larger than this many bytes.
    pub max_input_bytes: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            comment_char: DEFAULT_COMMENT_CHAR,
            convert_numbers: false,
            missing_sentinels: vec![DEFAULT_MISSING_SENTINEL.to_string()],
            max_input_bytes: None,
        }
    }
}

impl ParseOptions {
    pub fn comment_char(mut self, comment_char: char) -> Self {
        self.comment_char = comment_char;
        self
    }

    pub fn convert_numbers(mut self, convert: bool) -> Self {
        self.convert_numbers = convert;
        self
    }

    pub fn missing_sentinels<I, S>(mut self, sentinels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing_sentinels = sentinels.into_iter().map(Into::into).collect();
        self
    }

    pub fn max_input_bytes(mut self, limit: usize) -> Self {
        self.max_input_bytes = Some(limit);
        self
    }

    fn is_sentinel(&self, trimmed: &str) -> bool {
        self.missing_sentinels.iter().any(|s| s == trimmed)
    }
}

/// Parsed rows plus the rows that were dropped for having the wrong width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    /// Trimmed header names, empty when the input had fewer than two rows.
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
    pub skipped: Vec<RowWidthMismatch>,
}

/// Clean, tokenize and bind `text` to its header row.
///
/// Content with no data rows (empty, comments only, header only) yields an
/// empty outcome rather than an error.
pub fn parse(text: &str, options: &ParseOptions) -> Result<ParseOutcome, ParseError> {
    if let Some(limit) = options.max_input_bytes {
        if text.len() > limit {
            return Err(ParseError::InputTooLarge {
                size: text.len(),
                limit,
            });
        }
    }

    let cleaned = clean(text, options.comment_char);
    let rows: Vec<Vec<String>> = tokenize(&cleaned)
        .into_iter()
        .filter(|row| !(row.len() == 1 && row[0].is_empty()))
        .collect();

    let mut outcome = ParseOutcome::default();
    if rows.len() < 2 {
        return Ok(outcome);
    }

    let mut rows = rows.into_iter();
    if let Some(header) = rows.next() {
        outcome.headers = header.iter().map(|h| h.trim().to_string()).collect();
    }

    for (index, fields) in rows.enumerate() {
        // The header is row 1.
        let row_number = index + 2;
        if fields.len() != outcome.headers.len() {
            let mismatch = RowWidthMismatch {
                row: row_number,
                expected: outcome.headers.len(),
                found: fields.len(),
            };
            log::warn!("skipping CSV {}", mismatch);
            outcome.skipped.push(mismatch);
            continue;
        }

        let mut row = Row::with_capacity(fields.len());
        for (header, value) in outcome.headers.iter().zip(fields) {
            row.insert(header.as_str(), coerce(value, options));
        }
        outcome.rows.push(row);
    }

    log::debug!(
        "parsed {} rows ({} skipped)",
        outcome.rows.len(),
        outcome.skipped.len()
    );
    Ok(outcome)
}

fn coerce(value: String, options: &ParseOptions) -> FieldValue {
    if !options.convert_numbers {
        return FieldValue::Text(value);
    }

    let trimmed = value.trim();
    if trimmed.is_empty() || options.is_sentinel(trimmed) {
        return FieldValue::Text(value);
    }

    match parse_number(trimmed) {
        Some(n) => FieldValue::Number(n),
        None => FieldValue::Text(value),
    }
}

/// Parse a numeric string: decimal with optional sign, fraction and
/// exponent, or an unsigned `0x`/`0o`/`0b` integer literal.
///
/// Words such as `NaN` or `inf` are not numbers here, and values that
/// overflow to infinity stay text.
pub fn parse_number(s: &str) -> Option<f64> {
    let radix = match s.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u64::from_str_radix(&s[2..], radix).ok().map(|n| n as f64);
    }

    let allowed = s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !allowed || !s.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    s.parse::<f64>().ok().filter(|n| n.is_finite())
}
