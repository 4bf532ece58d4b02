//! Blocking-pool offload for CPU-bound PDF work

use std::time::Duration;

use tokio::time::timeout;

use super::error::{DocumentError, DocumentResult};

/// Run `f` on the blocking thread pool, bounded by `limit`.
///
/// On timeout the blocking thread keeps running, but the caller gets an
/// answer. A panic inside `f` surfaces as [`DocumentError::Join`].
pub async fn run_blocking<T, F>(limit: Duration, f: F) -> DocumentResult<T>
where
    F: FnOnce() -> DocumentResult<T> + Send + 'static,
    T: Send + 'static,
{
    match timeout(limit, tokio::task::spawn_blocking(f)).await {
        Ok(join_result) => join_result.map_err(|e| DocumentError::Join(e.to_string()))?,
        Err(_) => Err(DocumentError::Timeout(limit.as_secs())),
    }
}
