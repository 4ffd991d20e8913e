//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;
use std::time::Duration;

use mdocs_site::{Site, SiteError};

use crate::error::ServerError;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Document pipeline.
    pub(crate) site: Arc<Site>,
    /// Site title for HTML pages.
    pub(crate) site_title: String,
    /// Render timeout (`None` waits indefinitely).
    pub(crate) request_timeout: Option<Duration>,
    /// Application version for cache invalidation.
    pub(crate) version: String,
}

impl AppState {
    /// URL prefix pages are served under.
    pub(crate) fn url_prefix(&self) -> &str {
        &self.site.config().url_prefix
    }

    /// Run a site operation on the blocking pool.
    ///
    /// File I/O inside the pipeline is synchronous, so it never runs on the
    /// async workers. The configured timeout bounds the wait; the blocking
    /// task itself is left to finish in the background.
    pub(crate) async fn with_site<T, F>(&self, f: F) -> Result<T, ServerError>
    where
        T: Send + 'static,
        F: FnOnce(&Site) -> Result<T, SiteError> + Send + 'static,
    {
        let site = Arc::clone(&self.site);
        let task = tokio::task::spawn_blocking(move || f(&site));

        let joined = match self.request_timeout {
            Some(limit) => tokio::time::timeout(limit, task).await.map_err(|_| {
                tracing::error!(timeout_ms = limit.as_millis(), "Request timed out");
                ServerError::Timeout(limit)
            })?,
            None => task.await,
        };

        let result = joined.map_err(|e| {
            tracing::error!(error = %e, "Render task failed");
            ServerError::Internal(e.to_string())
        })?;

        result.map_err(ServerError::from)
    }
}
