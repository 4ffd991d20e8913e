//! Resolve-and-render pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use mdocs_renderer::{
    FrontMatter, MarkdownRenderer, TocEntry, parse_front_matter, rewrite_relative_links,
};
use mdocs_storage::{DocumentRequest, Storage, StorageError};

/// A rendered Markdown document.
#[derive(Clone, Debug)]
pub struct RenderedDocument {
    /// Rendered HTML body with rewritten links.
    pub html: String,
    /// Front-matter of the source file (empty if absent).
    pub front_matter: FrontMatter,
    /// Requested path, segments joined with `/` (empty for the default document).
    pub request_path: String,
    /// Resolved path relative to the content root, without extension.
    pub document_path: String,
    /// Location of the source file.
    pub source_path: PathBuf,
    /// Source file modification time (Unix timestamp).
    pub mtime: f64,
    /// Title from front-matter, else the first H1.
    pub title: Option<String>,
    /// Table of contents entries.
    pub toc: Vec<TocEntry>,
}

/// Error returned when a document can't be served.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// No document exists for the request.
    #[error("Document not found: {0}")]
    NotFound(String),
    /// Unexpected failure while reading or listing documents.
    #[error("Server error: {0}")]
    Server(String),
}

impl SiteError {
    /// Map a storage failure for `request_path`.
    fn from_storage(err: &StorageError, request_path: &str) -> Self {
        if err.is_not_found() {
            tracing::debug!(path = %request_path, error = %err, "Document not found");
            Self::NotFound(request_path.to_owned())
        } else {
            tracing::error!(path = %request_path, error = %err, "Failed to load document");
            Self::Server(err.to_string())
        }
    }
}

/// Configuration for [`Site`].
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// URL prefix documents are served under (`"/docs"`, or `""` for root).
    pub url_prefix: String,
    /// Strip the first H1 when front-matter provides a title.
    pub strip_title_heading: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url_prefix: "/docs".to_owned(),
            strip_title_heading: true,
        }
    }
}

/// Documentation site backed by a [`Storage`].
///
/// Holds no mutable state; every call resolves and renders from storage, so
/// a `Site` can be shared across threads behind an `Arc`.
pub struct Site {
    storage: Arc<dyn Storage>,
    config: SiteConfig,
}

impl Site {
    /// Create a new site with storage and configuration.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, config: SiteConfig) -> Self {
        Self { storage, config }
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// Resolve path segments to a document and render it.
    ///
    /// # Arguments
    ///
    /// * `segments` - URL path segments without the site prefix
    ///   (e.g. `["getting-started", "installation"]`). Empty segments are
    ///   ignored; no segments selects the default document.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] if no document matches (including
    /// traversal attempts) and [`SiteError::Server`] on I/O failure.
    pub fn resolve_and_render<S: AsRef<str>>(
        &self,
        segments: &[S],
    ) -> Result<RenderedDocument, SiteError> {
        self.render(&DocumentRequest::new(segments.iter().map(AsRef::as_ref)))
    }

    /// Render the document for a request.
    ///
    /// # Errors
    ///
    /// Same as [`resolve_and_render`](Self::resolve_and_render).
    pub fn render(&self, request: &DocumentRequest) -> Result<RenderedDocument, SiteError> {
        let request_path = request.joined();
        let to_site_error = |e: StorageError| SiteError::from_storage(&e, &request_path);

        let file = self.storage.resolve(request).map_err(to_site_error)?;
        let mtime = self.storage.mtime(&file).map_err(to_site_error)?;
        let raw = self.storage.read(&file).map_err(to_site_error)?;

        tracing::debug!(
            path = %request_path,
            source = %file.path.display(),
            "Rendering document"
        );

        let (front_matter, body) = parse_front_matter(&raw);
        let strip = self.config.strip_title_heading && front_matter.title().is_some();
        let result = MarkdownRenderer::new()
            .with_title_stripping(strip)
            .render_markdown(body);
        let html =
            rewrite_relative_links(&result.html, &file.document_path, &self.config.url_prefix);
        let title = front_matter.title().map(str::to_owned).or(result.title);

        Ok(RenderedDocument {
            html,
            front_matter,
            request_path,
            document_path: file.document_path,
            source_path: file.path,
            mtime,
            title,
            toc: result.toc,
        })
    }
}
