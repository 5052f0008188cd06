//! Row, lead count and shared input buffer types for the run-rate table.

use chrono::{DateTime, Local, NaiveDate};
use std::fmt;

/// Row identifiers are handed out once and never reused.
pub type RowId = u64;

/// A lead count as typed by the user.
///
/// Text that does not start with an integer is kept as `Invalid` rather than
/// rejected, and turns any run rate computed from it into `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadCount {
    Value(i64),
    Invalid,
}

impl Default for LeadCount {
    fn default() -> Self {
        LeadCount::Value(0)
    }
}

impl LeadCount {
    pub fn as_f64(&self) -> f64 {
        match self {
            LeadCount::Value(n) => *n as f64,
            LeadCount::Invalid => f64::NAN,
        }
    }
}

impl fmt::Display for LeadCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeadCount::Value(n) => write!(f, "{}", n),
            LeadCount::Invalid => write!(f, "NaN"),
        }
    }
}

/// The single draft shared by every unsaved row.
///
/// Unsaved rows display these dates rather than their own, and saving any
/// row computes its metrics from whatever the buffer holds at that moment.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tdrr::domain::InputBuffer;
///
/// let mut buffer = InputBuffer::default();
/// let start = NaiveDate::from_ymd_opt(2024, 3, 10);
/// buffer.set_start_date(start);
///
/// // An end date before the start is dropped
/// assert!(!buffer.set_end_date(NaiveDate::from_ymd_opt(2024, 3, 1)));
/// assert_eq!(buffer.end_date, None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputBuffer {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub lead_count: LeadCount,
}

impl InputBuffer {
    /// Overwrites the start date, even if it now falls after the end date.
    pub fn set_start_date(&mut self, date: Option<NaiveDate>) {
        self.start_date = date;
    }

    /// Overwrites the end date unless it orders before the start date.
    ///
    /// An absent date orders before any present one, so clearing the end
    /// date is refused while a start date is set.
    ///
    /// # Returns
    ///
    /// `true` if the buffer took the new value
    pub fn set_end_date(&mut self, date: Option<NaiveDate>) -> bool {
        if self.start_date.is_some() && date < self.start_date {
            return false;
        }
        self.end_date = date;
        true
    }
}

/// One date range / lead count record and its derived metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: RowId,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub months: i32,
    pub excluded_dates: Vec<String>,
    pub days: i64,
    pub lead_count: LeadCount,
    pub expected_drr: f64,
    pub last_updated: Option<DateTime<Local>>,
    pub is_saved: bool,
}

impl Row {
    /// Creates an unsaved row seeded from the buffer, with zeroed metrics.
    pub fn new(id: RowId, buffer: &InputBuffer) -> Self {
        Self {
            id,
            start_date: buffer.start_date,
            end_date: buffer.end_date,
            months: 0,
            excluded_dates: Vec::new(),
            days: 0,
            lead_count: buffer.lead_count,
            expected_drr: 0.0,
            last_updated: None,
            is_saved: false,
        }
    }

    pub fn excluded_dates_text(&self) -> String {
        self.excluded_dates.join(", ")
    }
}

/// Read-only copy of a row as the presentation layer should show it.
///
/// Unsaved rows carry the buffer's dates and no run rate yet.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub id: RowId,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub months: i32,
    pub excluded_dates: String,
    pub days: i64,
    pub lead_count: LeadCount,
    pub expected_drr: Option<f64>,
    pub last_updated: Option<DateTime<Local>>,
    pub is_saved: bool,
}

impl RowView {
    pub fn project(row: &Row, buffer: &InputBuffer) -> Self {
        let (start_date, end_date) = if row.is_saved {
            (row.start_date, row.end_date)
        } else {
            (buffer.start_date, buffer.end_date)
        };

        Self {
            id: row.id,
            start_date,
            end_date,
            months: row.months,
            excluded_dates: row.excluded_dates_text(),
            days: row.days,
            lead_count: row.lead_count,
            expected_drr: row.is_saved.then_some(row.expected_drr),
            last_updated: row.last_updated,
            is_saved: row.is_saved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_end_date_before_start_is_rejected() {
        let mut buffer = InputBuffer::default();
        buffer.set_start_date(date(2024, 1, 10));
        assert!(buffer.set_end_date(date(2024, 1, 20)));

        // Rejection leaves the previous value in place, every time
        assert!(!buffer.set_end_date(date(2024, 1, 5)));
        assert!(!buffer.set_end_date(date(2024, 1, 5)));
        assert_eq!(buffer.end_date, date(2024, 1, 20));
    }

    #[test]
    fn test_end_date_equal_to_start_is_accepted() {
        let mut buffer = InputBuffer::default();
        buffer.set_start_date(date(2024, 1, 10));
        assert!(buffer.set_end_date(date(2024, 1, 10)));
        assert_eq!(buffer.end_date, date(2024, 1, 10));
    }

    #[test]
    fn test_end_date_without_start_is_accepted() {
        let mut buffer = InputBuffer::default();
        assert!(buffer.set_end_date(date(1999, 12, 31)));
        assert!(buffer.set_end_date(None));
        assert_eq!(buffer.end_date, None);
    }

    #[test]
    fn test_clearing_end_date_with_start_set_is_rejected() {
        let mut buffer = InputBuffer::default();
        buffer.set_start_date(date(2024, 1, 1));
        buffer.set_end_date(date(2024, 2, 1));

        assert!(!buffer.set_end_date(None));
        assert_eq!(buffer.end_date, date(2024, 2, 1));
    }

    #[test]
    fn test_start_date_overwrites_unconditionally() {
        let mut buffer = InputBuffer::default();
        buffer.set_start_date(date(2024, 1, 1));
        buffer.set_end_date(date(2024, 1, 31));

        buffer.set_start_date(date(2024, 6, 1));
        assert_eq!(buffer.start_date, date(2024, 6, 1));
        assert_eq!(buffer.end_date, date(2024, 1, 31));
    }

    #[test]
    fn test_new_row_is_seeded_from_buffer() {
        let buffer = InputBuffer {
            start_date: date(2024, 2, 1),
            end_date: date(2024, 2, 29),
            lead_count: LeadCount::Value(7),
        };
        let row = Row::new(3, &buffer);

        assert_eq!(row.id, 3);
        assert_eq!(row.start_date, buffer.start_date);
        assert_eq!(row.end_date, buffer.end_date);
        assert_eq!(row.lead_count, LeadCount::Value(7));
        assert_eq!(row.months, 0);
        assert_eq!(row.days, 0);
        assert_eq!(row.expected_drr, 0.0);
        assert!(row.excluded_dates.is_empty());
        assert!(row.last_updated.is_none());
        assert!(!row.is_saved);
    }

    #[test]
    fn test_unsaved_projection_follows_buffer() {
        let mut buffer = InputBuffer::default();
        let row = Row::new(1, &buffer);

        buffer.set_start_date(date(2024, 5, 1));
        buffer.set_end_date(date(2024, 5, 9));
        let view = RowView::project(&row, &buffer);

        assert_eq!(view.start_date, date(2024, 5, 1));
        assert_eq!(view.end_date, date(2024, 5, 9));
        assert_eq!(view.expected_drr, None);
    }

    #[test]
    fn test_saved_projection_keeps_own_dates() {
        let buffer = InputBuffer {
            start_date: date(2024, 5, 1),
            end_date: date(2024, 5, 9),
            lead_count: LeadCount::default(),
        };
        let mut row = Row::new(1, &InputBuffer::default());
        row.start_date = date(2023, 1, 1);
        row.end_date = date(2023, 1, 2);
        row.expected_drr = 2.5;
        row.is_saved = true;

        let view = RowView::project(&row, &buffer);
        assert_eq!(view.start_date, date(2023, 1, 1));
        assert_eq!(view.end_date, date(2023, 1, 2));
        assert_eq!(view.expected_drr, Some(2.5));
    }

    #[test]
    fn test_lead_count_display() {
        assert_eq!(LeadCount::Value(-4).to_string(), "-4");
        assert_eq!(LeadCount::Invalid.to_string(), "NaN");
        assert!(LeadCount::Invalid.as_f64().is_nan());
    }
}
