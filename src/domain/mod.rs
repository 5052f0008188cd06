pub mod models;
pub mod services;
pub mod parser;
pub mod errors;

pub use models::*;
pub use services::*;
pub use parser::*;
pub use errors::*;
