//! Document error types

use thiserror::Error;

/// Errors raised while opening or slicing the reference document
#[derive(Debug, Error)]
pub enum DocumentError {
    /// No local copy of the reference document exists
    #[error("Reference document is not available locally")]
    NotReady,

    /// The local file could not be parsed as a multi-page PDF
    #[error("Corrupt document: {0}")]
    Corrupt(String),

    /// Requested page is outside `[1, page_count]`
    #[error("Page {index} out of range (document has {page_count} pages)")]
    PageOutOfRange { index: i64, page_count: u32 },

    /// Building or serializing the single-page PDF failed
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// IO error (std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Timeout error
    #[error("Operation timed out after {0} seconds")]
    Timeout(u64),

    /// Blocking task panicked or was cancelled
    #[error("Task join error: {0}")]
    Join(String),
}

/// Result type alias for document operations
pub type DocumentResult<T> = std::result::Result<T, DocumentError>;

/// Errors raised while downloading the reference document
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, TLS, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote answered with a non-success status
    #[error("Remote returned HTTP {0}")]
    Status(u16),

    /// Remote answered 2xx with an empty body
    #[error("Remote returned an empty body")]
    EmptyBody,

    /// Writing the downloaded bytes failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
