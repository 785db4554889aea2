//! CSS value parsing shared by the cascade and layout.
//!
//! [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/)

pub mod color;
pub mod length;

pub use color::ColorValue;
pub use length::{CalcExpr, CalcOp, CalcOperand, LengthContext, LengthValue, DEFAULT_FONT_SIZE_PX};

use trellis_common::ValueError;

/// Split a value into whitespace-separated components, keeping parenthesized
/// groups such as `rgb(0, 0, 0)` or `calc(100% - 10px)` in one piece.
#[must_use]
pub fn split_components(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0_u32;
    let mut start: Option<usize> = None;
    for (i, ch) in value.char_indices() {
        match ch {
            '(' => {
                depth += 1;
                if start.is_none() {
                    start = Some(i);
                }
            }
            ')' => {
                depth = depth.saturating_sub(1);
            }
            c if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    parts.push(&value[s..i]);
                }
            }
            _ => {
                if start.is_none() {
                    start = Some(i);
                }
            }
        }
    }
    if let Some(s) = start {
        parts.push(&value[s..]);
    }
    parts
}

/// Split on a delimiter that is not nested inside parentheses, trimming
/// each piece.
#[must_use]
pub fn split_top_level(value: &str, delimiter: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0_u32;
    let mut start = 0;
    for (i, ch) in value.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c == delimiter && depth == 0 => {
                parts.push(value[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(value[start..].trim());
    parts
}

/// Parse a plain `<number>`.
///
/// # Errors
///
/// Returns [`ValueError::InvalidNumber`] when the text is not a finite number.
pub fn parse_number(text: &str) -> Result<f64, ValueError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValueError::Empty);
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(ValueError::InvalidNumber(trimmed.to_string())),
    }
}

/// Split `text` into its leading numeric part and the unit that follows.
///
/// `"12.5px"` gives `("12.5", "px")`, `"-3e2%"` gives `("-3e2", "%")`. An
/// `e` only starts an exponent when a digit (optionally signed) follows, so
/// `"2em"` keeps its unit.
pub(crate) fn split_number_unit(text: &str) -> (&str, &str) {
    let bytes = text.as_bytes();
    let mut i = 0;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
        i += 1;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    text.split_at(i)
}
