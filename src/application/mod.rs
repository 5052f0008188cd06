//! Application layer managing state and business workflows.
//!
//! This module coordinates between the domain layer and presentation layer:
//! the row store holds the table, the `App` facade adds the shared input
//! buffer, selection and text entry.

pub mod store;
pub mod state;

pub use store::*;
pub use state::*;
