//! Lenient parsing for the free-text fields of a row.
//!
//! Nothing here returns an error. Text that cannot be understood becomes an
//! explicit invalid value and flows through the arithmetic as such.

use super::models::LeadCount;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%d %b %Y",
    "%b %d %Y",
    "%b %d, %Y",
];

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// An entry of a row's excluded-date list after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExcludedDate {
    Date(NaiveDate),
    Invalid,
}

impl ExcludedDate {
    /// Parses one excluded-date entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use tdrr::domain::ExcludedDate;
    ///
    /// assert_eq!(
    ///     ExcludedDate::parse("2024/02/10"),
    ///     ExcludedDate::Date(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap())
    /// );
    /// assert_eq!(ExcludedDate::parse("bad-date"), ExcludedDate::Invalid);
    /// ```
    pub fn parse(text: &str) -> Self {
        parse_date(text).map_or(ExcludedDate::Invalid, ExcludedDate::Date)
    }

    /// Whether this entry lies in `[start, end]`. Invalid entries never do.
    pub fn falls_within(&self, start: NaiveDate, end: NaiveDate) -> bool {
        match self {
            ExcludedDate::Date(date) => *date >= start && *date <= end,
            ExcludedDate::Invalid => false,
        }
    }
}

/// Parses a calendar date in any of the accepted layouts.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(date_time) = NaiveDateTime::parse_from_str(text, format) {
            return Some(date_time.date());
        }
    }

    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|date_time| date_time.date_naive())
}

/// Splits comma separated text into trimmed entries.
///
/// Empty input still yields a single empty entry, which later parses as
/// invalid.
pub fn split_excluded_dates(text: &str) -> Vec<String> {
    text.split(',').map(|part| part.trim().to_string()).collect()
}

/// Reads a base-10 integer from the start of `text`.
///
/// Leading whitespace and one sign are allowed, then the longest run of
/// digits is taken and anything after it ignored. Without any digit the
/// result is `LeadCount::Invalid`. Values past `i64` saturate.
pub fn parse_lead_count(text: &str) -> LeadCount {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();

    let sign_len = match bytes.first() {
        Some(b'+') | Some(b'-') => 1,
        _ => 0,
    };
    let digit_len = bytes[sign_len..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();

    if digit_len == 0 {
        return LeadCount::Invalid;
    }

    let number = &trimmed[..sign_len + digit_len];
    match number.parse::<i64>() {
        Ok(value) => LeadCount::Value(value),
        Err(_) if number.starts_with('-') => LeadCount::Value(i64::MIN),
        Err(_) => LeadCount::Value(i64::MAX),
    }
}
