//! Derived metrics for a row: elapsed months, net days and run rate.
//!
//! Every function here is pure and total. Absent dates give zero, invalid
//! excluded dates are skipped and an invalid lead count yields `NaN`.

use super::models::LeadCount;
use super::parser::ExcludedDate;
use chrono::{Datelike, NaiveDate};

/// Calendar-month distance between two dates, ignoring the day of month.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tdrr::domain::months_between;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 31);
/// let end = NaiveDate::from_ymd_opt(2024, 2, 1);
/// assert_eq!(months_between(start, end), 1);
/// assert_eq!(months_between(start, None), 0);
/// ```
pub fn months_between(start: Option<NaiveDate>, end: Option<NaiveDate>) -> i32 {
    match (start, end) {
        (Some(start), Some(end)) => {
            (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32)
        }
        _ => 0,
    }
}

/// Inclusive day count from `start` to `end`, minus each excluded date that
/// falls inside that window.
///
/// Duplicates count once per occurrence and the result is not clamped, so
/// it can go negative.
///
/// # Arguments
///
/// * `start` - First day of the window
/// * `end` - Last day of the window
/// * `excluded_dates` - Raw excluded-date entries, parsed leniently
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tdrr::domain::days_between;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1);
/// let end = NaiveDate::from_ymd_opt(2024, 1, 10);
/// let none: [&str; 0] = [];
/// assert_eq!(days_between(start, end, &none), 10);
/// assert_eq!(days_between(start, end, &["2024-01-05", "nonsense"]), 9);
/// ```
pub fn days_between<S: AsRef<str>>(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    excluded_dates: &[S],
) -> i64 {
    let (Some(start), Some(end)) = (start, end) else {
        return 0;
    };

    let mut days = (end - start).num_days() + 1;
    for entry in excluded_dates {
        if ExcludedDate::parse(entry.as_ref()).falls_within(start, end) {
            days -= 1;
        }
    }
    days
}

/// Leads per day. Zero days gives `0.0`; an invalid lead count gives `NaN`.
pub fn expected_drr(lead_count: LeadCount, days: i64) -> f64 {
    if days == 0 {
        return 0.0;
    }
    lead_count.as_f64() / days as f64
}

/// The values a row freezes when it is saved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedMetrics {
    pub months: i32,
    pub days: i64,
    pub expected_drr: f64,
}

impl DerivedMetrics {
    pub fn compute<S: AsRef<str>>(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        excluded_dates: &[S],
        lead_count: LeadCount,
    ) -> Self {
        let months = months_between(start, end);
        let days = days_between(start, end, excluded_dates);
        Self {
            months,
            days,
            expected_drr: expected_drr(lead_count, days),
        }
    }
}
