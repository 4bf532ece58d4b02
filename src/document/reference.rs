//! Parsed reference document
//!
//! A thin wrapper over `lopdf::Document` that validates the page tree on
//! open and exposes 1-based page access.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

use lopdf::{Document, ObjectId};

use super::error::{DocumentError, DocumentResult};

/// A successfully opened multi-page PDF
pub struct ReferenceDocument {
    inner: Document,
    /// 1-based page number -> page object
    pages: BTreeMap<u32, ObjectId>,
}

impl ReferenceDocument {
    /// Open and parse the PDF at `path`
    ///
    /// A missing file is [`DocumentError::NotReady`]; anything that exists
    /// but does not parse into at least one page is [`DocumentError::Corrupt`].
    pub fn open<P: AsRef<Path>>(path: P) -> DocumentResult<Self> {
        let data = std::fs::read(path.as_ref()).map_err(|e| match e.kind() {
            ErrorKind::NotFound => DocumentError::NotReady,
            _ => DocumentError::Io(e),
        })?;

        Self::from_bytes(&data)
    }

    /// Parse a PDF held in memory
    pub fn from_bytes(data: &[u8]) -> DocumentResult<Self> {
        if data.is_empty() {
            return Err(DocumentError::Corrupt("file is empty".into()));
        }

        let inner = Document::load_mem(data).map_err(|e| DocumentError::Corrupt(e.to_string()))?;
        let pages = inner.get_pages();

        if pages.is_empty() {
            return Err(DocumentError::Corrupt("document has no pages".into()));
        }

        Ok(Self { inner, pages })
    }

    /// Number of pages in the page tree
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Page object for a 1-based page number
    pub fn get_page(&self, index: u32) -> Option<ObjectId> {
        self.pages.get(&index).copied()
    }

    /// Decoded content stream of a 1-based page
    pub fn page_content(&self, index: u32) -> DocumentResult<Vec<u8>> {
        let page_id = self.get_page(index).ok_or(DocumentError::PageOutOfRange {
            index: index as i64,
            page_count: self.page_count(),
        })?;

        self.inner
            .get_page_content(page_id)
            .map_err(|e| DocumentError::Corrupt(e.to_string()))
    }

    /// Page objects in page order
    pub(crate) fn page_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.pages.values().copied()
    }

    pub(crate) fn inner(&self) -> &Document {
        &self.inner
    }
}

impl std::fmt::Debug for ReferenceDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceDocument")
            .field("page_count", &self.page_count())
            .finish()
    }
}
