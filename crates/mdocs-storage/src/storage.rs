//! Storage trait, request types and error types.
//!
//! # Path Convention
//!
//! A [`DocumentRequest`] holds URL path segments (`["guide", "intro"]`).
//! A [`ResolvedFilePath`] carries both the file on disk and its document
//! path: the file path relative to the content root with the Markdown
//! extension stripped (`"guide/README"` for a directory request `guide`).

use std::fmt;
use std::path::{Path, PathBuf};

/// Ordered path segments identifying a requested document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentRequest {
    segments: Vec<String>,
}

impl DocumentRequest {
    /// Create a request from path segments. Empty segments are dropped.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty())
                .collect(),
        }
    }

    /// Split a URL path (`"/guide/intro/"`) into a request.
    #[must_use]
    pub fn from_url_path(path: &str) -> Self {
        Self::new(path.split('/'))
    }

    /// Path segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// True when no segments were requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments joined with `/`.
    #[must_use]
    pub fn joined(&self) -> String {
        self.segments.join("/")
    }

    /// True if any segment could escape the content root.
    #[must_use]
    pub fn has_traversal(&self) -> bool {
        self.segments
            .iter()
            .any(|s| s == "." || s == ".." || s.contains('\\') || s.contains('\0'))
    }
}

/// A Markdown file that resolution located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFilePath {
    /// Location of the file (absolute for filesystem backends).
    pub path: PathBuf,
    /// Path relative to the content root, without extension (e.g. `guide/intro`).
    pub document_path: String,
}

/// A Markdown file found by [`Storage::scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    /// Path relative to the content root, without extension.
    pub document_path: String,
    /// Location of the file.
    pub path: PathBuf,
}

/// Semantic error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// No file could be located for the request.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Request path is not acceptable (e.g. traversal segments).
    InvalidPath,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    kind: StorageErrorKind,
    path: Option<PathBuf>,
    backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: &Path) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            _ => StorageErrorKind::Other,
        };
        Self::new(kind).with_source(err).with_path(path)
    }

    /// Semantic error category.
    #[must_use]
    pub fn kind(&self) -> StorageErrorKind {
        self.kind
    }

    /// Path context, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Backend identifier, if any.
    #[must_use]
    pub fn backend(&self) -> Option<&'static str> {
        self.backend
    }

    /// True for errors that mean "nothing to serve here".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind,
            StorageErrorKind::NotFound | StorageErrorKind::InvalidPath
        )
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::InvalidPath => "Invalid path",
            StorageErrorKind::Other => "Error",
        };
        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Storage abstraction for document resolution and retrieval.
pub trait Storage: Send + Sync {
    /// Resolve a request to a Markdown file.
    ///
    /// # Errors
    ///
    /// [`StorageErrorKind::NotFound`] when no file can be located,
    /// [`StorageErrorKind::InvalidPath`] for traversal segments, other kinds
    /// on unexpected I/O failure.
    fn resolve(&self, request: &DocumentRequest) -> Result<ResolvedFilePath, StorageError>;

    /// Read a resolved file to completion.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file can't be read.
    fn read(&self, file: &ResolvedFilePath) -> Result<String, StorageError>;

    /// Modification time as seconds since Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the mtime can't be retrieved.
    fn mtime(&self, file: &ResolvedFilePath) -> Result<f64, StorageError>;

    /// List every Markdown file, ordered by numeric prefix within each directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the content root can't be listed.
    fn scan(&self) -> Result<Vec<DocumentEntry>, StorageError>;
}
