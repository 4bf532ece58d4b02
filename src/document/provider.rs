//! Local copy of the reference document
//!
//! The provider owns the on-disk path of the bill PDF. It fetches the file
//! once at startup when absent, and re-opens it from disk on every request
//! so an operator can swap the file without restarting the bot.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::error::{DocumentError, DocumentResult, FetchError};
use super::fetch::{compute_digest, DocumentFetcher};
use super::reference::ReferenceDocument;
use super::task::run_blocking;

/// Default bound on open/parse of the local file
pub const DEFAULT_OPEN_TIMEOUT: Duration = Duration::from_secs(30);

/// What a fresh open of the local file currently yields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentState {
    NotReady,
    Ready { pages: u32 },
    Corrupt(String),
}

/// Result of [`DocumentProvider::ensure_local`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalStatus {
    /// File already on disk, nothing fetched
    AlreadyPresent,
    /// File downloaded and moved into place
    Fetched { bytes: usize },
    /// No file and none could be fetched
    Unavailable,
}

pub struct DocumentProvider {
    path: PathBuf,
    source_url: Option<String>,
    fetcher: Arc<dyn DocumentFetcher>,
    /// Serializes concurrent `ensure_local` calls
    fetch_guard: Mutex<()>,
    open_timeout: Duration,
}

impl DocumentProvider {
    pub fn new(
        path: impl Into<PathBuf>,
        source_url: Option<String>,
        fetcher: Arc<dyn DocumentFetcher>,
    ) -> Self {
        Self {
            path: path.into(),
            source_url,
            fetcher,
            fetch_guard: Mutex::new(()),
            open_timeout: DEFAULT_OPEN_TIMEOUT,
        }
    }

    pub fn with_open_timeout(mut self, open_timeout: Duration) -> Self {
        self.open_timeout = open_timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Make sure a local copy exists, downloading it once if needed.
    ///
    /// An existing file is never re-fetched or re-validated. Fetch failures
    /// are logged and leave the document absent; they are not retried.
    pub async fn ensure_local(&self) -> LocalStatus {
        let _guard = self.fetch_guard.lock().await;

        if self.is_ready() {
            tracing::info!(
                path = %self.path.display(),
                "Reference document already present, skipping download"
            );
            return LocalStatus::AlreadyPresent;
        }

        let Some(url) = self.source_url.as_deref() else {
            tracing::warn!(
                path = %self.path.display(),
                "Reference document missing and no download URL configured"
            );
            return LocalStatus::Unavailable;
        };

        tracing::info!(url, "Downloading reference document");

        match self.download(url).await {
            Ok(bytes) => LocalStatus::Fetched { bytes },
            Err(e) => {
                tracing::error!(url, error = %e, "Reference document download failed");
                LocalStatus::Unavailable
            }
        }
    }

    /// Fetch into a temporary sibling file, then rename into place
    async fn download(&self, url: &str) -> Result<usize, FetchError> {
        let data = self.fetcher.fetch(url).await?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, &data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        tracing::info!(
            path = %self.path.display(),
            bytes = data.len(),
            sha256 = %compute_digest(&data),
            "Reference document downloaded"
        );

        Ok(data.len())
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        self.path
            .with_file_name(format!(".{}.{}.part", name, Uuid::new_v4()))
    }

    /// True iff the local file exists
    pub fn is_ready(&self) -> bool {
        self.path.is_file()
    }

    /// Open and parse the local file.
    ///
    /// Never cached: each call reads the file as it is on disk right now.
    pub async fn open(&self) -> DocumentResult<ReferenceDocument> {
        if !self.is_ready() {
            return Err(DocumentError::NotReady);
        }

        let path = self.path.clone();
        run_blocking(self.open_timeout, move || ReferenceDocument::open(path)).await
    }

    /// Report the current readiness of the local file
    pub async fn state(&self) -> DocumentState {
        match self.open().await {
            Ok(document) => DocumentState::Ready {
                pages: document.page_count(),
            },
            Err(DocumentError::NotReady) => DocumentState::NotReady,
            Err(e) => DocumentState::Corrupt(e.to_string()),
        }
    }
}
