//! Mapping table error types

use thiserror::Error;

/// Errors raised while loading the consumer -> page table
#[derive(Debug, Error)]
pub enum MappingError {
    /// The mapping file could not be opened or read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The mapping file is not valid delimited text
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row's page column is not a base-10 integer
    #[error("Invalid page index {value:?} on line {line}")]
    InvalidPage { line: u64, value: String },
}

pub type MappingResult<T> = std::result::Result<T, MappingError>;
