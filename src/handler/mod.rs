//! Bill request handling
//!
//! Turns one inbound consumer number into either a single-page PDF or a
//! user-facing rejection. Each stage is a hard gate; the first failing
//! gate decides the reply and nothing after it runs.
//!
//! ```text
//! Received ─▶ Validated ─▶ DocumentChecked ─▶ PageValidated ─▶ Extracted ─▶ Sent
//!     │            │               │                  │              │
//!     └────────────┴───────────────┴──────────────────┴──────────────┴─▶ Rejected
//! ```
//!
//! The handler holds only shared read-only state, so it is safe to call
//! concurrently from many chats. Every open loads the whole bill PDF into
//! memory, so past the lookup gate requests queue on a semaphore.

mod error;
mod reply;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use crate::document::{
    run_blocking, DocumentError, DocumentProvider, PageExtractor, SinglePageExtractor,
};
use crate::mapping::MappingStore;

pub use error::RetrievalError;
pub use reply::{PageAttachment, Reply, USAGE};

/// Default bound on single-page extraction
pub const DEFAULT_EXTRACT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of requests allowed to hold the document at once
pub const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Per-request progress, logged at each transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Validated,
    DocumentChecked,
    PageValidated,
    Extracted,
    Sent,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::Validated => "validated",
            Stage::DocumentChecked => "document_checked",
            Stage::PageValidated => "page_validated",
            Stage::Extracted => "extracted",
            Stage::Sent => "sent",
        };
        f.write_str(name)
    }
}

pub struct RequestHandler {
    mapping: Arc<MappingStore>,
    documents: Arc<DocumentProvider>,
    extractor: Arc<dyn PageExtractor>,
    extract_timeout: Duration,
    permits: Semaphore,
}

impl RequestHandler {
    pub fn new(mapping: Arc<MappingStore>, documents: Arc<DocumentProvider>) -> Self {
        Self {
            mapping,
            documents,
            extractor: Arc::new(SinglePageExtractor),
            extract_timeout: DEFAULT_EXTRACT_TIMEOUT,
            permits: Semaphore::new(DEFAULT_MAX_CONCURRENT),
        }
    }

    pub fn with_extract_timeout(mut self, extract_timeout: Duration) -> Self {
        self.extract_timeout = extract_timeout;
        self
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn PageExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Bound how many requests may open and extract at the same time (at least 1)
    pub fn with_max_concurrent(mut self, limit: usize) -> Self {
        self.permits = Semaphore::new(limit.max(1));
        self
    }

    /// Handle one inbound message and build the reply for the chat
    pub async fn respond(&self, text: &str) -> Reply {
        match self.retrieve(text).await {
            Ok(attachment) => Reply::Document(attachment),
            Err(e) => Reply::Text(e.user_message().to_string()),
        }
    }

    /// Run the request through every gate, logging the terminal outcome
    pub async fn retrieve(&self, text: &str) -> Result<PageAttachment, RetrievalError> {
        let identifier = text.trim();
        tracing::debug!(identifier, stage = %Stage::Received, "Bill request");

        let result = self.run(identifier).await;

        match &result {
            Ok(attachment) => tracing::info!(
                identifier,
                outcome = "extracted",
                page = attachment.page,
                bytes = attachment.bytes.len(),
                "Bill request served"
            ),
            Err(e) if e.needs_admin() => {
                tracing::error!(identifier, outcome = e.kind(), error = %e, "Bill request rejected")
            }
            Err(e @ RetrievalError::ExtractionFailed(_)) => {
                tracing::error!(identifier, outcome = e.kind(), error = %e, "Bill request rejected")
            }
            Err(e) => {
                tracing::info!(identifier, outcome = e.kind(), error = %e, "Bill request rejected")
            }
        }

        result
    }

    async fn run(&self, identifier: &str) -> Result<PageAttachment, RetrievalError> {
        let page = self
            .mapping
            .lookup(identifier)
            .ok_or_else(|| RetrievalError::IdentifierNotFound(identifier.to_string()))?;
        tracing::debug!(identifier, page, stage = %Stage::Validated);

        if !self.documents.is_ready() {
            return Err(RetrievalError::DocumentNotReady);
        }

        // Held until the reply bytes exist; the semaphore is never closed
        let _permit = self.permits.acquire().await.ok();

        let document = self.documents.open().await.map_err(|e| match e {
            DocumentError::NotReady => RetrievalError::DocumentNotReady,
            other => RetrievalError::CorruptDocument(other.to_string()),
        })?;
        let page_count = document.page_count();
        tracing::debug!(identifier, page_count, stage = %Stage::DocumentChecked);

        let index = u32::try_from(page)
            .ok()
            .filter(|p| (1..=page_count).contains(p))
            .ok_or(RetrievalError::InvalidPageIndex { page, page_count })?;
        tracing::debug!(identifier, index, stage = %Stage::PageValidated);

        let extractor = self.extractor.clone();
        let bytes = run_blocking(self.extract_timeout, move || {
            extractor.extract(&document, index)
        })
        .await
        .map_err(|e| RetrievalError::ExtractionFailed(e.to_string()))?;
        tracing::debug!(identifier, bytes = bytes.len(), stage = %Stage::Extracted);

        Ok(PageAttachment::new(identifier, index, bytes))
    }
}
