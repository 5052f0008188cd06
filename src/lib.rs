//! TDRR - Terminal Daily Run Rate
//!
//! Records date ranges, excluded dates and lead counts per row, and derives
//! each row's expected daily run rate when it is saved.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
