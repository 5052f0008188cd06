//! Infrastructure layer providing external service integrations.
//!
//! Configuration on disk, CSV report files, the system clipboard and the
//! log file all live here, behind `AppResult`.

pub mod config;
pub mod export;
pub mod clipboard;
pub mod logging;

pub use config::*;
pub use export::*;
pub use clipboard::*;
pub use logging::*;
