use crate::domain::{AppError, AppResult};
use crate::infrastructure::Config;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured log filter.
pub const LOG_ENV: &str = "TDRR_LOG";

/// Installs a file-backed `tracing` subscriber when `log_file` is set.
///
/// The terminal is owned by the UI, so nothing is ever logged to stdout or
/// stderr. Without a configured file this is a no-op.
///
/// # Returns
///
/// `true` if a subscriber was installed
pub fn init_logging(config: &Config) -> AppResult<bool> {
    let Some(path) = config.log_file.as_ref() else {
        return Ok(false);
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .map_err(|e| AppError::Logging(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))?;

    Ok(true)
}
