use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures at the edges of the application: files, clipboard, logging.
///
/// The row store and derivation engine never produce these; bad input there
/// degrades to sentinel values instead.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

pub type AppResult<T> = Result<T, AppError>;
