//! Locale-aware numeric parsing and formatting.
//!
//! Raw text such as `"1.234,56"` is normalized by stripping every occurrence
//! of the thousands separator and then replacing the decimal separator with
//! the canonical `.`. The inverse functions group integer digits in threes
//! and restore the declared separators, so that well-formed input survives a
//! parse/format round trip.
//!
//! These functions are pure and independent of the table-coercion loop.

use std::borrow::Cow;

/// Normalizes a raw numeric string to the canonical `[-]digits[.digits]` form.
///
/// Surrounding whitespace is trimmed. Thousands separators are removed before
/// the decimal separator is rewritten, so the two never interfere when they
/// differ (which [`ColumnDescriptor`](super::ColumnDescriptor) validation
/// guarantees).
///
/// # Examples
///
/// ```rust
/// use term_assay::coercion::numeric::normalize_numeric;
///
/// assert_eq!(normalize_numeric(" 1.234,56 ", Some('.'), Some(',')), "1234.56");
/// assert_eq!(normalize_numeric("1,234", Some(','), None), "1234");
/// assert_eq!(normalize_numeric("42", None, None), "42");
/// ```
pub fn normalize_numeric(
    raw: &str,
    thousands_sep: Option<char>,
    decimal_sep: Option<char>,
) -> Cow<'_, str> {
    let trimmed = raw.trim();
    let needs_thousands = thousands_sep.is_some_and(|sep| trimmed.contains(sep));
    let needs_decimal = decimal_sep.is_some_and(|sep| sep != '.' && trimmed.contains(sep));

    if !needs_thousands && !needs_decimal {
        return Cow::Borrowed(trimmed);
    }

    let normalized = trimmed
        .chars()
        .filter(|c| Some(*c) != thousands_sep)
        .map(|c| if Some(c) == decimal_sep { '.' } else { c })
        .collect::<String>();
    Cow::Owned(normalized)
}

/// Parses a 64-bit integer after stripping thousands separators.
///
/// Returns `None` when the normalized text is not a valid integer, including
/// text carrying a fractional part.
pub fn parse_i64(raw: &str, thousands_sep: Option<char>) -> Option<i64> {
    let normalized = normalize_numeric(raw, thousands_sep, None);
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<i64>().ok()
}

/// Parses a 64-bit float after separator normalization.
///
/// Accepts the forms understood by Rust's `f64` parser (including exponents
/// and `NaN`/`inf`) once separators are normalized.
pub fn parse_f64(raw: &str, thousands_sep: Option<char>, decimal_sep: Option<char>) -> Option<f64> {
    let normalized = normalize_numeric(raw, thousands_sep, decimal_sep);
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok()
}

/// Formats an integer, grouping digits with the thousands separator if given.
pub fn format_i64(value: i64, thousands_sep: Option<char>) -> String {
    let digits = value.unsigned_abs().to_string();
    let body = match thousands_sep {
        Some(sep) => group_digits(&digits, sep),
        None => digits,
    };
    if value < 0 {
        format!("-{body}")
    } else {
        body
    }
}

/// Formats a float using the shortest representation that parses back to the
/// same value, then applies the declared separators.
pub fn format_f64(value: f64, thousands_sep: Option<char>, decimal_sep: Option<char>) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let canonical = value.to_string();
    let (sign, unsigned) = match canonical.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", canonical.as_str()),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let integer = match thousands_sep {
        Some(sep) => group_digits(integer, sep),
        None => integer.to_string(),
    };

    match fraction {
        Some(fraction) => {
            let point = decimal_sep.unwrap_or('.');
            format!("{sign}{integer}{point}{fraction}")
        }
        None => format!("{sign}{integer}"),
    }
}

/// Inserts `sep` between every group of three digits, counting from the right.
fn group_digits(digits: &str, sep: char) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(sep);
        }
        grouped.push(c);
    }
    grouped
}
