//! User-visible retrieval failures

use thiserror::Error;

/// Every way a bill request can be rejected.
///
/// Each variant carries a fixed user-facing message; the `Display` text is
/// the operator-facing detail that goes to the logs.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Consumer number {0:?} not in mapping")]
    IdentifierNotFound(String),

    #[error("Reference document not available locally")]
    DocumentNotReady,

    #[error("Reference document corrupt: {0}")]
    CorruptDocument(String),

    #[error("Mapped page {page} outside document range 1..={page_count}")]
    InvalidPageIndex { page: i64, page_count: u32 },

    #[error("Page extraction failed: {0}")]
    ExtractionFailed(String),
}

impl RetrievalError {
    /// Short outcome label used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            RetrievalError::IdentifierNotFound(_) => "identifier_not_found",
            RetrievalError::DocumentNotReady => "document_not_ready",
            RetrievalError::CorruptDocument(_) => "corrupt_document",
            RetrievalError::InvalidPageIndex { .. } => "invalid_page_index",
            RetrievalError::ExtractionFailed(_) => "extraction_failed",
        }
    }

    /// Message sent back to the chat
    pub fn user_message(&self) -> &'static str {
        match self {
            RetrievalError::IdentifierNotFound(_) => "Consumer number not found in the list.",
            RetrievalError::DocumentNotReady => {
                "The bill PDF is not available yet. Please try again later."
            }
            RetrievalError::CorruptDocument(_) => {
                "The bill PDF is corrupted. Please contact the admin."
            }
            RetrievalError::InvalidPageIndex { .. } => {
                "The page number for this consumer is invalid. Please contact the admin."
            }
            RetrievalError::ExtractionFailed(_) => {
                "Could not extract your bill. Please try again later."
            }
        }
    }

    /// Whether an operator has to act before the same request can succeed
    pub fn needs_admin(&self) -> bool {
        matches!(
            self,
            RetrievalError::CorruptDocument(_) | RetrievalError::InvalidPageIndex { .. }
        )
    }
}
