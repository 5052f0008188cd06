//! Presentation layer handling terminal UI and user input.
//!
//! This module renders the run-rate table with ratatui and maps crossterm
//! key events onto `App` operations.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;
