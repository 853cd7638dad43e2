//! Date, time and datetime parsing with strftime-style patterns.
//!
//! Values are converted to the Arrow physical representations used by the
//! typed table: days since the Unix epoch for `Date32`, microseconds since
//! midnight for `Time64(Microsecond)` and microseconds since the epoch for
//! `Timestamp(Microsecond, None)`.

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Default pattern for `date` columns.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
/// Default pattern for `time` columns.
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";
/// Default pattern for `datetime` columns.
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const MICROS_PER_SECOND: i64 = 1_000_000;

/// Returns true when `pattern` is a well-formed strftime pattern.
pub fn is_valid_pattern(pattern: &str) -> bool {
    !pattern.is_empty() && StrftimeItems::new(pattern).all(|item| !matches!(item, Item::Error))
}

fn unix_epoch() -> NaiveDate {
    NaiveDate::default()
}

/// Parses a date and returns days since 1970-01-01.
pub fn parse_date(raw: &str, pattern: &str) -> Option<i32> {
    let date = NaiveDate::parse_from_str(raw.trim(), pattern).ok()?;
    date_to_days(date)
}

/// Parses a time of day and returns microseconds since midnight.
pub fn parse_time(raw: &str, pattern: &str) -> Option<i64> {
    let time = NaiveTime::parse_from_str(raw.trim(), pattern).ok()?;
    Some(time_to_micros(time))
}

/// Parses a datetime and returns microseconds since the Unix epoch.
///
/// A pattern carrying only date fields (for example `%Y%m%d`) is accepted and
/// yields midnight of that day.
pub fn parse_datetime(raw: &str, pattern: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let datetime = NaiveDateTime::parse_from_str(trimmed, pattern)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, pattern)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;
    Some(datetime.and_utc().timestamp_micros())
}

/// Converts a date to days since the Unix epoch.
pub fn date_to_days(date: NaiveDate) -> Option<i32> {
    i32::try_from(date.signed_duration_since(unix_epoch()).num_days()).ok()
}

/// Converts a time of day to microseconds since midnight.
pub fn time_to_micros(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight()) * MICROS_PER_SECOND
        + i64::from(time.nanosecond() / 1_000)
}

/// Formats a date with the given pattern.
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    date.format(pattern).to_string()
}

/// Formats a time of day with the given pattern.
pub fn format_time(time: NaiveTime, pattern: &str) -> String {
    time.format(pattern).to_string()
}

/// Formats a datetime with the given pattern.
pub fn format_datetime(datetime: NaiveDateTime, pattern: &str) -> String {
    datetime.format(pattern).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_validation() {
        assert!(is_valid_pattern("%Y%m%d"));
        assert!(is_valid_pattern("%d/%m/%Y %H:%M"));
        assert!(!is_valid_pattern("%Q"));
        assert!(!is_valid_pattern(""));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("1970-01-02", DEFAULT_DATE_FORMAT), Some(1));
        assert_eq!(parse_date("19691231", "%Y%m%d"), Some(-1));
        assert_eq!(parse_date("2024-02-30", DEFAULT_DATE_FORMAT), None);
        assert_eq!(parse_date("02/01/1970", DEFAULT_DATE_FORMAT), None);
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("00:00:01", DEFAULT_TIME_FORMAT), Some(1_000_000));
        assert_eq!(
            parse_time("13:45:10", DEFAULT_TIME_FORMAT),
            Some((13 * 3600 + 45 * 60 + 10) * 1_000_000)
        );
        assert_eq!(parse_time("25:00:00", DEFAULT_TIME_FORMAT), None);
    }

    #[test]
    fn test_parse_datetime_with_date_only_pattern() {
        assert_eq!(parse_datetime("19700102", "%Y%m%d"), Some(86_400_000_000));
        assert_eq!(
            parse_datetime("1970-01-01 00:00:10", DEFAULT_DATETIME_FORMAT),
            Some(10_000_000)
        );
        assert_eq!(parse_datetime("not a date", DEFAULT_DATETIME_FORMAT), None);
    }

    #[test]
    fn test_format_round_trip() {
        let date = NaiveDate::from_ymd_opt(2021, 12, 31).unwrap();
        let text = format_date(date, "%d/%m/%Y");
        assert_eq!(text, "31/12/2021");
        let days = parse_date(&text, "%d/%m/%Y").unwrap();
        assert_eq!(days, date_to_days(date).unwrap());
    }
}
