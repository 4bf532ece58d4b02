//! Consumer number -> page index table
//!
//! Loaded once at startup from a two-column CSV file (`consumer,page`)
//! and shared read-only with every request afterwards.

mod error;
mod store;

pub use error::{MappingError, MappingResult};
pub use store::{LoadMode, LoadReport, MappingStore};
