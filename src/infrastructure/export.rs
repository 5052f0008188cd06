//! CSV report of the table as currently shown.

use crate::domain::{AppResult, RowView};
use crate::infrastructure::Config;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// One CSV line. Field names double as the header row.
#[derive(Debug, Serialize)]
struct ReportRecord {
    id: u64,
    start_date: String,
    end_date: String,
    months: i32,
    excluded_dates: String,
    days: i64,
    lead_count: String,
    expected_drr: String,
    last_updated: String,
    saved: bool,
}

impl ReportRecord {
    fn from_view(view: &RowView, config: &Config) -> Self {
        Self {
            id: view.id,
            start_date: config.format_date(view.start_date),
            end_date: config.format_date(view.end_date),
            months: view.months,
            excluded_dates: view.excluded_dates.clone(),
            days: view.days,
            lead_count: view.lead_count.to_string(),
            expected_drr: view
                .expected_drr
                .map(|drr| config.format_drr(drr))
                .unwrap_or_default(),
            last_updated: config.format_timestamp(view.last_updated),
            saved: view.is_saved,
        }
    }
}

pub struct CsvExporter;

impl CsvExporter {
    /// Writes every row to `path` as CSV with a header line.
    ///
    /// # Returns
    ///
    /// The number of rows written
    pub fn export_rows(rows: &[RowView], config: &Config, path: &Path) -> AppResult<usize> {
        let mut writer = csv::Writer::from_path(path)?;
        for view in rows {
            writer.serialize(ReportRecord::from_view(view, config))?;
        }
        writer.flush()?;

        info!(path = %path.display(), rows = rows.len(), "csv report written");
        Ok(rows.len())
    }
}
