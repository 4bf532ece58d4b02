//! Reference document handling
//!
//! This module owns everything between "a bill PDF somewhere" and
//! "a single-page PDF in memory".
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐   fetch once    ┌──────────────────┐
//! │  DocumentProvider    │ ──────────────▶ │ DocumentFetcher  │
//! │  (local path, state) │                 │ (HttpFetcher)    │
//! └──────────────────────┘                 └──────────────────┘
//!            │ open() per request
//!            ▼
//! ┌──────────────────────┐     PageExtractor     ┌──────────────┐
//! │  ReferenceDocument   │ ────────────────────▶ │   Vec<u8>    │
//! │  (lopdf page tree)   │                       │ (1-page PDF) │
//! └──────────────────────┘                       └──────────────┘
//! ```
//!
//! Parsing and extraction are CPU-bound and run on the blocking pool via
//! [`run_blocking`] under a timeout.

mod error;
mod extract;
mod fetch;
mod provider;
mod reference;
mod task;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::{DocumentError, DocumentResult, FetchError};
pub use extract::{extract_single_page, PageExtractor, SinglePageExtractor};
pub use fetch::{compute_digest, DocumentFetcher, HttpFetcher};
pub use provider::{DocumentProvider, DocumentState, LocalStatus, DEFAULT_OPEN_TIMEOUT};
pub use reference::ReferenceDocument;
pub use task::run_blocking;
