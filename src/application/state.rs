//! Application state management for the run-rate table.
//!
//! `App` owns the row store and the shared input buffer, and layers row
//! selection and modal text entry on top for the terminal UI.

use crate::application::RowStore;
use crate::domain::{parse_date, AppResult, InputBuffer, LeadCount, RowId, RowView};
use crate::infrastructure::Config;
use chrono::{DateTime, Local, NaiveDate};
use tracing::{debug, info, warn};

/// Format used to prefill and read date fields while editing.
const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Represents the current mode of the application.
///
/// The mode decides how key presses are interpreted and which prompt the
/// status bar shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Navigation between rows, single-key actions
    Normal,
    /// Typing the shared start date
    EditStartDate,
    /// Typing the shared end date
    EditEndDate,
    /// Typing the selected row's excluded dates
    EditExcludedDates,
    /// Typing the selected row's lead count
    EditLeadCount,
    /// CSV export prompt is open
    ExportCsv,
    /// Help screen is displayed
    Help,
}

impl AppMode {
    pub fn is_text_entry(&self) -> bool {
        !matches!(self, AppMode::Normal | AppMode::Help)
    }
}

/// Main application state.
///
/// # Examples
///
/// ```
/// use tdrr::application::App;
///
/// let mut app = App::default();
/// assert_eq!(app.rows().len(), 1);
///
/// let id = app.add_row();
/// assert_eq!(id, 2);
/// assert_eq!(app.selected_row, 1);
/// ```
#[derive(Debug)]
pub struct App {
    store: RowStore,
    buffer: InputBuffer,
    /// Display and export preferences
    pub config: Config,
    /// Index of the selected row in display order
    pub selected_row: usize,
    /// First row visible in the table viewport
    pub scroll_row: usize,
    /// Number of table rows that fit on screen
    pub viewport_rows: usize,
    /// Current application mode
    pub mode: AppMode,
    /// Text being typed in any entry mode
    pub input: String,
    /// Byte offset of the cursor within `input`
    pub cursor_position: usize,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl App {
    /// Creates the app with a single blank unsaved row.
    pub fn new(config: Config) -> Self {
        let buffer = InputBuffer::default();
        let mut store = RowStore::new();
        store.add_row(&buffer);

        Self {
            store,
            buffer,
            config,
            selected_row: 0,
            scroll_row: 0,
            viewport_rows: 20,
            mode: AppMode::Normal,
            input: String::new(),
            cursor_position: 0,
            help_scroll: 0,
            status_message: None,
        }
    }

    /// Copy of every row as it should be displayed.
    pub fn rows(&self) -> Vec<RowView> {
        self.store
            .rows()
            .iter()
            .map(|row| RowView::project(row, &self.buffer))
            .collect()
    }

    pub fn buffer(&self) -> InputBuffer {
        self.buffer
    }

    pub fn row(&self, id: RowId) -> Option<RowView> {
        self.store.get(id).map(|row| RowView::project(row, &self.buffer))
    }

    pub fn selected_row_id(&self) -> Option<RowId> {
        self.store.rows().get(self.selected_row).map(|row| row.id)
    }

    fn is_saved(&self, id: RowId) -> bool {
        self.store.get(id).is_some_and(|row| row.is_saved)
    }

    /// Appends a row seeded from the buffer and selects it.
    pub fn add_row(&mut self) -> RowId {
        let id = self.store.add_row(&self.buffer);
        self.selected_row = self.store.len() - 1;
        self.ensure_selection_visible();
        self.status_message = Some(format!("Added row {}", id));
        id
    }

    pub fn set_start_date(&mut self, date: Option<NaiveDate>) {
        self.buffer.set_start_date(date);
        debug!(start_date = ?date, "buffer start date set");
    }

    /// Sets the buffer's end date unless it is before the start date.
    pub fn set_end_date(&mut self, date: Option<NaiveDate>) -> bool {
        let accepted = self.buffer.set_end_date(date);
        debug!(end_date = ?date, accepted, "buffer end date set");
        accepted
    }

    /// Replaces an unsaved row's excluded dates. Saved rows are left alone.
    pub fn set_excluded_dates(&mut self, id: RowId, raw_text: &str) -> bool {
        if self.is_saved(id) {
            self.status_message = Some(format!("Row {} is saved and read-only", id));
            return false;
        }
        self.store.set_excluded_dates(id, raw_text);
        true
    }

    /// Replaces an unsaved row's lead count. Saved rows are left alone.
    pub fn set_lead_count(&mut self, id: RowId, raw_text: &str) -> bool {
        if self.is_saved(id) {
            self.status_message = Some(format!("Row {} is saved and read-only", id));
            return false;
        }
        self.store.set_lead_count(id, raw_text);
        true
    }

    /// Saves a row using the buffer as it is right now.
    pub fn save_row(&mut self, id: RowId) -> bool {
        self.save_row_at(id, Local::now())
    }

    /// Saves a row with an explicit timestamp.
    pub fn save_row_at(&mut self, id: RowId, now: DateTime<Local>) -> bool {
        let saved = self.store.save(id, &self.buffer, now);
        if saved {
            self.status_message = Some(format!("Saved row {}", id));
        }
        saved
    }

    /// Deletes an unsaved row. Saved rows stay in the table.
    pub fn delete_row(&mut self, id: RowId) -> bool {
        if self.is_saved(id) {
            self.status_message = Some(format!("Row {} is saved and cannot be deleted", id));
            return false;
        }
        let deleted = self.store.delete(id);
        if deleted {
            self.clamp_selection();
            self.status_message = Some(format!("Deleted row {}", id));
        }
        deleted
    }

    pub fn select_next(&mut self) {
        if self.selected_row + 1 < self.store.len() {
            self.selected_row += 1;
            self.ensure_selection_visible();
        }
    }

    pub fn select_previous(&mut self) {
        if self.selected_row > 0 {
            self.selected_row -= 1;
            self.ensure_selection_visible();
        }
    }

    pub fn select_first(&mut self) {
        self.selected_row = 0;
        self.ensure_selection_visible();
    }

    pub fn select_last(&mut self) {
        self.selected_row = self.store.len().saturating_sub(1);
        self.ensure_selection_visible();
    }

    fn clamp_selection(&mut self) {
        self.selected_row = self.selected_row.min(self.store.len().saturating_sub(1));
        self.ensure_selection_visible();
    }

    /// Updates the viewport size for proper scrolling calculations.
    pub fn update_viewport_size(&mut self, rows: usize) {
        self.viewport_rows = rows.max(1);
        self.ensure_selection_visible();
    }

    /// Ensures the selected row is visible by adjusting scroll position.
    pub fn ensure_selection_visible(&mut self) {
        if self.selected_row < self.scroll_row {
            self.scroll_row = self.selected_row;
        } else if self.selected_row >= self.scroll_row + self.viewport_rows {
            self.scroll_row = self.selected_row + 1 - self.viewport_rows;
        }
    }

    /// Enters a field-editing mode for the selected row.
    ///
    /// The input is prefilled with the field's current value. Saved rows and
    /// an empty table refuse editing.
    pub fn start_editing(&mut self, mode: AppMode) {
        let Some(id) = self.selected_row_id() else {
            self.status_message = Some("No row selected".to_string());
            return;
        };
        if self.is_saved(id) {
            self.status_message = Some(format!("Row {} is saved and read-only", id));
            return;
        }

        let current = match mode {
            AppMode::EditStartDate => format_input_date(self.buffer.start_date),
            AppMode::EditEndDate => format_input_date(self.buffer.end_date),
            AppMode::EditExcludedDates => self
                .store
                .get(id)
                .map(|row| row.excluded_dates_text())
                .unwrap_or_default(),
            AppMode::EditLeadCount => match self.store.get(id).map(|row| row.lead_count) {
                Some(LeadCount::Value(n)) => n.to_string(),
                _ => String::new(),
            },
            _ => return,
        };

        self.mode = mode;
        self.input = current;
        self.cursor_position = self.input.len();
        self.status_message = None;
    }

    /// Applies the typed text to the field being edited and returns to
    /// normal mode.
    pub fn finish_editing(&mut self) {
        let text = std::mem::take(&mut self.input);
        let mode = self.mode;
        self.mode = AppMode::Normal;
        self.cursor_position = 0;

        match mode {
            AppMode::EditStartDate => {
                if let Some(date) = self.read_date_input(&text) {
                    self.set_start_date(date);
                }
            }
            AppMode::EditEndDate => {
                if let Some(date) = self.read_date_input(&text) {
                    if !self.set_end_date(date) {
                        self.status_message =
                            Some("End date cannot be before the start date".to_string());
                    }
                }
            }
            AppMode::EditExcludedDates => {
                if let Some(id) = self.selected_row_id() {
                    self.set_excluded_dates(id, &text);
                }
            }
            AppMode::EditLeadCount => {
                if let Some(id) = self.selected_row_id() {
                    self.set_lead_count(id, &text);
                }
            }
            _ => {}
        }
    }

    /// Empty text clears the date. Unreadable text keeps the buffer as it
    /// was and reports it.
    fn read_date_input(&mut self, text: &str) -> Option<Option<NaiveDate>> {
        if text.trim().is_empty() {
            return Some(None);
        }
        match parse_date(text) {
            Some(date) => Some(Some(date)),
            None => {
                self.status_message = Some(format!("Invalid date: {}", text.trim()));
                None
            }
        }
    }

    /// Cancels any text entry without applying it.
    pub fn cancel_editing(&mut self) {
        self.mode = AppMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    /// Opens the CSV export prompt with the configured default filename.
    pub fn start_csv_export(&mut self) {
        self.mode = AppMode::ExportCsv;
        self.input = self.config.export_filename.clone();
        self.cursor_position = self.input.len();
        self.status_message = None;
    }

    /// Gets the filename to use for CSV export.
    ///
    /// Returns the typed filename if not empty, otherwise the configured
    /// default.
    pub fn get_csv_export_filename(&self) -> String {
        let typed = self.input.trim();
        if typed.is_empty() {
            self.config.export_filename.clone()
        } else {
            typed.to_string()
        }
    }

    /// Processes the result of a CSV export and returns to normal mode.
    pub fn set_csv_export_result(&mut self, filename: &str, result: AppResult<usize>) {
        match result {
            Ok(count) => {
                self.status_message = Some(format!(
                    "Exported {} row{} to {}",
                    count,
                    if count == 1 { "" } else { "s" },
                    filename
                ));
            }
            Err(error) => {
                warn!(%error, filename, "csv export failed");
                self.status_message = Some(format!("Export failed: {}", error));
            }
        }
        self.cancel_editing();
    }

    /// Tab separated summary of a row, in display order of the columns.
    pub fn row_summary(&self, id: RowId) -> Option<String> {
        let view = self.row(id)?;
        Some(
            [
                view.id.to_string(),
                self.display_date(view.start_date),
                self.display_date(view.end_date),
                view.months.to_string(),
                view.excluded_dates.clone(),
                view.days.to_string(),
                view.lead_count.to_string(),
                self.display_drr(view.expected_drr),
                self.display_timestamp(view.last_updated),
            ]
            .join("\t"),
        )
    }

    /// Processes the result of copying a row to the clipboard.
    pub fn set_clipboard_result(&mut self, id: RowId, result: AppResult<()>) {
        match result {
            Ok(()) => {
                info!(row_id = id, "row copied to clipboard");
                self.status_message = Some(format!("Copied row {} to clipboard", id));
            }
            Err(error) => {
                warn!(%error, "clipboard copy failed");
                self.status_message = Some(error.to_string());
            }
        }
    }

    pub fn display_date(&self, date: Option<NaiveDate>) -> String {
        self.config.format_date(date)
    }

    /// `-` until the row is saved, then the rate at the configured precision.
    pub fn display_drr(&self, drr: Option<f64>) -> String {
        match drr {
            Some(value) => self.config.format_drr(value),
            None => "-".to_string(),
        }
    }

    pub fn display_timestamp(&self, timestamp: Option<DateTime<Local>>) -> String {
        self.config.format_timestamp(timestamp)
    }

    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor_position, c);
        self.cursor_position += c.len_utf8();
    }

    pub fn delete_char_before_cursor(&mut self) {
        if let Some(c) = self.input[..self.cursor_position].chars().next_back() {
            self.cursor_position -= c.len_utf8();
            self.input.remove(self.cursor_position);
        }
    }

    pub fn delete_char_at_cursor(&mut self) {
        if self.cursor_position < self.input.len() {
            self.input.remove(self.cursor_position);
        }
    }

    pub fn move_cursor_left(&mut self) {
        if let Some(c) = self.input[..self.cursor_position].chars().next_back() {
            self.cursor_position -= c.len_utf8();
        }
    }

    pub fn move_cursor_right(&mut self) {
        if let Some(c) = self.input[self.cursor_position..].chars().next() {
            self.cursor_position += c.len_utf8();
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_position = self.input.len();
    }
}

fn format_input_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(INPUT_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.insert_char(c);
        }
    }

    #[test]
    fn test_app_default() {
        let app = App::default();
        assert_eq!(app.selected_row, 0);
        assert_eq!(app.scroll_row, 0);
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.input.is_empty());
        assert!(app.status_message.is_none());
        assert_eq!(app.buffer(), InputBuffer::default());

        // Starts with one blank row, id 1
        let rows = app.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 1);
        assert!(!rows[0].is_saved);
    }

    #[test]
    fn test_add_row_selects_new_row() {
        let mut app = App::default();
        let id = app.add_row();

        assert_eq!(id, 2);
        assert_eq!(app.selected_row, 1);
        assert_eq!(app.selected_row_id(), Some(2));
    }

    #[test]
    fn test_unsaved_rows_share_buffer_dates() {
        let mut app = App::default();
        app.add_row();
        app.set_start_date(date(2024, 4, 1));
        app.set_end_date(date(2024, 4, 30));

        for view in app.rows() {
            assert_eq!(view.start_date, date(2024, 4, 1));
            assert_eq!(view.end_date, date(2024, 4, 30));
        }
    }

    #[test]
    fn test_saved_row_keeps_dates_after_buffer_moves() {
        let mut app = App::default();
        app.set_start_date(date(2024, 4, 1));
        app.set_end_date(date(2024, 4, 30));
        app.save_row(1);

        app.set_start_date(date(2025, 1, 1));
        app.set_end_date(date(2025, 1, 2));

        let saved = app.row(1).unwrap();
        assert_eq!(saved.start_date, date(2024, 4, 1));
        assert_eq!(saved.end_date, date(2024, 4, 30));
        assert_eq!(saved.days, 30);
    }

    #[test]
    fn test_full_scenario() {
        let mut app = App::default();
        let id = app.add_row();
        assert!(app.set_excluded_dates(id, "2024-02-10, bad-date"));
        app.set_start_date(date(2024, 2, 1));
        assert!(app.set_end_date(date(2024, 2, 15)));
        assert!(app.set_lead_count(id, "20"));
        assert!(app.save_row(id));

        let view = app.row(id).unwrap();
        assert_eq!(view.months, 0);
        assert_eq!(view.days, 14);
        let drr = view.expected_drr.unwrap();
        assert!((drr - 20.0 / 14.0).abs() < 1e-9);
        assert_eq!(app.display_drr(view.expected_drr), "1.4");
        assert!(view.last_updated.is_some());
    }

    #[test]
    fn test_saved_row_is_read_only() {
        let mut app = App::default();
        app.set_lead_count(1, "5");
        app.save_row(1);

        assert!(!app.set_lead_count(1, "50"));
        assert!(!app.set_excluded_dates(1, "2024-01-01"));
        assert!(!app.delete_row(1));
        assert!(!app.save_row(1));

        let view = app.row(1).unwrap();
        assert_eq!(view.lead_count, LeadCount::Value(5));
        assert_eq!(view.excluded_dates, "");
    }

    #[test]
    fn test_save_row_at_stamps_given_time() {
        let mut app = App::default();
        let now = Local.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        app.save_row_at(1, now);

        assert_eq!(app.row(1).unwrap().last_updated, Some(now));
        assert_eq!(app.display_timestamp(Some(now)), "2024-06-01 12:00:00");
    }

    #[test]
    fn test_delete_clamps_selection() {
        let mut app = App::default();
        app.add_row();
        app.add_row();
        assert_eq!(app.selected_row, 2);

        assert!(app.delete_row(3));
        assert_eq!(app.selected_row, 1);
        assert_eq!(app.selected_row_id(), Some(2));

        app.delete_row(1);
        app.delete_row(2);
        assert!(app.rows().is_empty());
        assert_eq!(app.selected_row, 0);
        assert_eq!(app.selected_row_id(), None);
    }

    #[test]
    fn test_selection_bounds() {
        let mut app = App::default();
        app.select_previous();
        assert_eq!(app.selected_row, 0);

        app.add_row();
        app.select_first();
        app.select_next();
        app.select_next();
        assert_eq!(app.selected_row, 1);
    }

    #[test]
    fn test_scrolling_follows_selection() {
        let mut app = App::default();
        app.update_viewport_size(3);
        for _ in 0..5 {
            app.add_row();
        }
        assert_eq!(app.selected_row, 5);
        assert_eq!(app.scroll_row, 3);

        app.select_first();
        assert_eq!(app.scroll_row, 0);
    }

    #[test]
    fn test_edit_start_date_flow() {
        let mut app = App::default();
        app.start_editing(AppMode::EditStartDate);
        assert_eq!(app.mode, AppMode::EditStartDate);
        assert!(app.input.is_empty());

        type_text(&mut app, "2024-03-05");
        app.finish_editing();

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.buffer().start_date, date(2024, 3, 5));
    }

    #[test]
    fn test_edit_prefills_current_value() {
        let mut app = App::default();
        app.set_start_date(date(2024, 3, 5));
        app.set_excluded_dates(1, "2024-03-06,2024-03-07");
        app.set_lead_count(1, "12");

        app.start_editing(AppMode::EditStartDate);
        assert_eq!(app.input, "2024-03-05");
        assert_eq!(app.cursor_position, 10);
        app.cancel_editing();

        app.start_editing(AppMode::EditExcludedDates);
        assert_eq!(app.input, "2024-03-06, 2024-03-07");
        app.cancel_editing();

        app.start_editing(AppMode::EditLeadCount);
        assert_eq!(app.input, "12");
    }

    #[test]
    fn test_invalid_date_input_keeps_buffer() {
        let mut app = App::default();
        app.set_start_date(date(2024, 3, 5));

        app.start_editing(AppMode::EditStartDate);
        app.input = "tomorrow".to_string();
        app.finish_editing();

        assert_eq!(app.buffer().start_date, date(2024, 3, 5));
        assert_eq!(app.status_message.as_deref(), Some("Invalid date: tomorrow"));
    }

    #[test]
    fn test_empty_date_input_clears() {
        let mut app = App::default();
        app.set_start_date(date(2024, 3, 5));

        app.start_editing(AppMode::EditStartDate);
        app.input.clear();
        app.finish_editing();

        assert_eq!(app.buffer().start_date, None);
    }

    #[test]
    fn test_rejected_end_date_reports() {
        let mut app = App::default();
        app.set_start_date(date(2024, 3, 5));
        app.set_end_date(date(2024, 3, 9));

        app.start_editing(AppMode::EditEndDate);
        app.input = "2024-03-01".to_string();
        app.finish_editing();

        assert_eq!(app.buffer().end_date, date(2024, 3, 9));
        assert!(app.status_message.unwrap().contains("before the start date"));
    }

    #[test]
    fn test_editing_saved_row_refused() {
        let mut app = App::default();
        app.save_row(1);
        app.start_editing(AppMode::EditLeadCount);

        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.status_message.unwrap().contains("read-only"));
    }

    #[test]
    fn test_editing_without_rows_refused() {
        let mut app = App::default();
        app.delete_row(1);
        app.start_editing(AppMode::EditStartDate);

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.status_message.as_deref(), Some("No row selected"));
    }

    #[test]
    fn test_cursor_editing_handles_multibyte() {
        let mut app = App::default();
        type_text(&mut app, "aé");
        assert_eq!(app.cursor_position, 3);

        app.move_cursor_left();
        assert_eq!(app.cursor_position, 1);
        app.insert_char('x');
        assert_eq!(app.input, "axé");

        app.move_cursor_end();
        app.delete_char_before_cursor();
        assert_eq!(app.input, "ax");

        app.move_cursor_home();
        app.delete_char_at_cursor();
        assert_eq!(app.input, "x");
        app.move_cursor_right();
        assert_eq!(app.cursor_position, 1);
    }

    #[test]
    fn test_csv_export_prompt() {
        let mut app = App::default();
        app.start_csv_export();
        assert_eq!(app.mode, AppMode::ExportCsv);
        assert_eq!(app.input, "drr_report.csv");

        app.input = "   ".to_string();
        assert_eq!(app.get_csv_export_filename(), "drr_report.csv");

        app.set_csv_export_result("out.csv", Ok(3));
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.status_message.as_deref(), Some("Exported 3 rows to out.csv"));
    }

    #[test]
    fn test_row_summary() {
        let mut app = App::default();
        app.set_start_date(date(2024, 1, 1));
        app.set_end_date(date(2024, 1, 10));
        app.set_lead_count(1, "25");
        let now = Local.with_ymd_and_hms(2024, 1, 11, 7, 5, 0).unwrap();
        app.save_row_at(1, now);

        assert_eq!(
            app.row_summary(1).unwrap(),
            "1\t2024-01-01\t2024-01-10\t0\t\t10\t25\t2.5\t2024-01-11 07:05:00"
        );
        assert!(app.row_summary(42).is_none());
    }

    #[test]
    fn test_display_drr() {
        let app = App::default();
        assert_eq!(app.display_drr(None), "-");
        assert_eq!(app.display_drr(Some(0.0)), "0.0");
        assert_eq!(app.display_drr(Some(f64::NAN)), "NaN");
    }
}
