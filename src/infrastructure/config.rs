use crate::domain::{AppError, AppResult};
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::{self, Display, Write};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable pointing at an alternative config file.
pub const CONFIG_ENV: &str = "TDRR_CONFIG";

/// Largest accepted `drr_precision`; an `f64` carries no more digits.
pub const MAX_DRR_PRECISION: usize = 17;

/// User preferences read from `config.json`. Every field has a default, so a
/// partial file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// `chrono` format used to display dates
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// `chrono` format used for the "Last Updated" column
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    /// Decimal places shown for the expected DRR
    #[serde(default = "default_drr_precision")]
    pub drr_precision: usize,
    /// Filename suggested by the CSV export prompt
    #[serde(default = "default_export_filename")]
    pub export_filename: String,
    /// Where to write logs; logging is off when unset
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Filter directive used when `TDRR_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_timestamp_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

fn default_drr_precision() -> usize {
    1
}

fn default_export_filename() -> String {
    "drr_report.csv".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            timestamp_format: default_timestamp_format(),
            drr_precision: default_drr_precision(),
            export_filename: default_export_filename(),
            log_file: None,
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Location of the config file: `$TDRR_CONFIG`, else the platform config
    /// directory, else the working directory.
    pub fn config_file() -> PathBuf {
        if let Some(path) = env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tdrr")
            .join("config.json")
    }

    /// Loads the config from its usual location, writing the defaults
    /// there on first run.
    pub fn load() -> AppResult<Self> {
        Self::load_or_init(&Self::config_file())
    }

    /// Loads the config at `path`. When the file does not exist yet the
    /// defaults are written to it, so users have a file to edit.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load_from`], plus `AppError::Io` when the default
    /// file cannot be written.
    pub fn load_or_init(path: &Path) -> AppResult<Self> {
        if path.exists() {
            return Self::load_from(path);
        }
        let config = Self::default();
        config.save_to(path)?;
        Ok(config)
    }

    /// Loads the config at `path`, falling back to defaults when the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the file exists but cannot be read, and
    /// `AppError::Config` if it is not valid JSON for this struct or holds
    /// a value that cannot be displayed.
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| AppError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate().map_err(|message| AppError::Config {
            path: path.to_path_buf(),
            message,
        })?;
        Ok(config)
    }

    /// Renders a sample value with every format so a bad one fails here
    /// rather than on the first draw.
    fn validate(&self) -> Result<(), String> {
        let now = Local::now();
        if try_format(now.date_naive().format(&self.date_format)).is_err() {
            return Err(format!(
                "date_format cannot format a date: {}",
                self.date_format
            ));
        }
        if try_format(now.format(&self.timestamp_format)).is_err() {
            return Err(format!(
                "timestamp_format cannot format a timestamp: {}",
                self.timestamp_format
            ));
        }
        if self.drr_precision > MAX_DRR_PRECISION {
            return Err(format!(
                "drr_precision must be at most {}, got {}",
                MAX_DRR_PRECISION, self.drr_precision
            ));
        }
        Ok(())
    }

    /// Writes the config as pretty JSON, creating parent directories.
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| AppError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Date in `date_format`, empty when absent or unformattable.
    pub fn format_date(&self, date: Option<NaiveDate>) -> String {
        date.and_then(|d| try_format(d.format(&self.date_format)).ok())
            .unwrap_or_default()
    }

    /// Timestamp in `timestamp_format`, empty when absent or unformattable.
    pub fn format_timestamp(&self, timestamp: Option<DateTime<Local>>) -> String {
        timestamp
            .and_then(|ts| try_format(ts.format(&self.timestamp_format)).ok())
            .unwrap_or_default()
    }

    /// Rate with `drr_precision` decimals, capped at [`MAX_DRR_PRECISION`].
    pub fn format_drr(&self, drr: f64) -> String {
        format!("{:.*}", self.drr_precision.min(MAX_DRR_PRECISION), drr)
    }
}

/// `to_string` panics when a `chrono` format cannot be rendered; this reports
/// the failure instead.
fn try_format(value: impl Display) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write!(out, "{}", value)?;
    Ok(out)
}
