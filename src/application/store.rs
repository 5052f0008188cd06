//! Ordered, id-addressed storage for the rows of the run-rate table.

use crate::domain::{
    parse_lead_count, split_excluded_dates, DerivedMetrics, InputBuffer, Row, RowId,
};
use chrono::{DateTime, Local};
use tracing::{debug, info};

/// Owns the row sequence and the id counter.
///
/// Operations addressed at an unknown id do nothing. Save is the only
/// transition that freezes a row and it happens at most once.
///
/// # Examples
///
/// ```
/// use tdrr::application::RowStore;
/// use tdrr::domain::InputBuffer;
///
/// let mut store = RowStore::new();
/// let buffer = InputBuffer::default();
/// let first = store.add_row(&buffer);
/// let second = store.add_row(&buffer);
/// assert_eq!(second, first + 1);
///
/// store.delete(first);
/// assert_eq!(store.rows()[0].id, second);
/// ```
#[derive(Debug, Clone)]
pub struct RowStore {
    rows: Vec<Row>,
    next_id: RowId,
}

impl Default for RowStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RowStore {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Creates an empty store whose first row will get `first_id`.
    pub fn starting_at(first_id: RowId) -> Self {
        Self {
            rows: Vec::new(),
            next_id: first_id,
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn get(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn get_mut(&mut self, id: RowId) -> Option<&mut Row> {
        self.rows.iter_mut().find(|row| row.id == id)
    }

    /// Appends an unsaved row seeded from the buffer.
    ///
    /// # Returns
    ///
    /// The id given to the new row
    pub fn add_row(&mut self, buffer: &InputBuffer) -> RowId {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.push(Row::new(id, buffer));
        debug!(row_id = id, "row added");
        id
    }

    /// Replaces the row's excluded dates with the comma separated entries of
    /// `raw_text`. The save state is not checked here.
    pub fn set_excluded_dates(&mut self, id: RowId, raw_text: &str) {
        if let Some(row) = self.get_mut(id) {
            row.excluded_dates = split_excluded_dates(raw_text);
            debug!(row_id = id, count = row.excluded_dates.len(), "excluded dates replaced");
        }
    }

    /// Replaces the row's lead count with whatever integer `raw_text` starts
    /// with, or the invalid sentinel.
    pub fn set_lead_count(&mut self, id: RowId, raw_text: &str) {
        if let Some(row) = self.get_mut(id) {
            row.lead_count = parse_lead_count(raw_text);
            debug!(row_id = id, lead_count = %row.lead_count, "lead count replaced");
        }
    }

    /// Freezes a row with metrics computed from the buffer's dates.
    ///
    /// The buffer's dates are recorded on the row so the saved range stays
    /// visible after the buffer moves on. Saving an already saved row does
    /// nothing.
    ///
    /// # Returns
    ///
    /// `true` if the row went from unsaved to saved
    pub fn save(&mut self, id: RowId, buffer: &InputBuffer, now: DateTime<Local>) -> bool {
        let Some(row) = self.get_mut(id) else {
            return false;
        };
        if row.is_saved {
            debug!(row_id = id, "row already saved");
            return false;
        }

        let metrics = DerivedMetrics::compute(
            buffer.start_date,
            buffer.end_date,
            row.excluded_dates.as_slice(),
            row.lead_count,
        );

        row.start_date = buffer.start_date;
        row.end_date = buffer.end_date;
        row.months = metrics.months;
        row.days = metrics.days;
        row.expected_drr = metrics.expected_drr;
        row.last_updated = Some(now);
        row.is_saved = true;

        info!(
            row_id = id,
            months = metrics.months,
            days = metrics.days,
            expected_drr = metrics.expected_drr,
            "row saved"
        );
        true
    }

    /// Removes a row whatever its save state.
    ///
    /// # Returns
    ///
    /// `true` if a row was removed
    pub fn delete(&mut self, id: RowId) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id != id);
        let removed = self.rows.len() != before;
        if removed {
            info!(row_id = id, "row deleted");
        }
        removed
    }
}
