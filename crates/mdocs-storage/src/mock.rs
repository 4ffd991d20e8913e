//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::RwLock;

use crate::resolver::{EntryKind, Resolver, ResolverConfig, Tree, compare_ordered};
use crate::storage::{DocumentEntry, DocumentRequest, ResolvedFilePath, Storage, StorageError};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

/// Mock storage for testing.
///
/// Stores files in memory keyed by their path relative to the content
/// root. Directories are implied by file paths. Use the builder methods to
/// configure the mock with test data.
///
/// # Example
///
/// ```ignore
/// use mdocs_storage::{DocumentRequest, MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("guide/README.md", "# Guide\n\nContent.")
///     .with_mtime("guide/README.md", 1_700_000_000.0);
///
/// let file = storage.resolve(&DocumentRequest::from_url_path("guide")).unwrap();
/// let content = storage.read(&file).unwrap();
/// ```
#[derive(Debug)]
pub struct MockStorage {
    files: RwLock<BTreeMap<String, String>>,
    mtimes: RwLock<HashMap<String, f64>>,
    resolver: Resolver,
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::with_config(ResolverConfig::default())
    }
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty mock storage with custom naming conventions.
    #[must_use]
    pub fn with_config(config: ResolverConfig) -> Self {
        Self {
            files: RwLock::new(BTreeMap::new()),
            mtimes: RwLock::new(HashMap::new()),
            resolver: Resolver::new(config),
        }
    }

    /// Add a file with content.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.set_file(path, content);
        self
    }

    /// Set modification time for a path.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file, relative to the content root
    /// * `mtime` - Modification time as seconds since Unix epoch
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_mtime(self, path: impl Into<String>, mtime: f64) -> Self {
        self.mtimes.write().unwrap().insert(path.into(), mtime);
        self
    }

    /// Add or replace a file after construction.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_file(&self, path: impl Into<String>, content: impl Into<String>) {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), content.into());
    }

    /// Remove a file after construction.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn remove_file(&self, path: &str) {
        self.files.write().unwrap().remove(path);
    }

    fn not_found(path: impl Into<PathBuf>) -> StorageError {
        StorageError::not_found(path).with_backend(BACKEND)
    }
}

impl Tree for MockStorage {
    fn entry_kind(&self, rel: &str) -> Result<Option<EntryKind>, StorageError> {
        let files = self.files.read().unwrap();
        if files.contains_key(rel) {
            return Ok(Some(EntryKind::File));
        }
        let prefix = format!("{rel}/");
        Ok(files
            .keys()
            .any(|p| rel.is_empty() || p.starts_with(&prefix))
            .then_some(EntryKind::Dir))
    }

    fn markdown_files(&self, rel: &str, extension: &str) -> Result<Vec<String>, StorageError> {
        let prefix = if rel.is_empty() {
            String::new()
        } else {
            format!("{rel}/")
        };
        let suffix = format!(".{extension}");
        let files = self.files.read().unwrap();
        Ok(files
            .keys()
            .filter_map(|p| p.strip_prefix(&prefix))
            .filter(|name| !name.contains('/') && !name.starts_with('.'))
            .filter(|name| name.len() > suffix.len() && name.ends_with(&suffix))
            .map(str::to_owned)
            .collect())
    }
}

impl Storage for MockStorage {
    fn resolve(&self, request: &DocumentRequest) -> Result<ResolvedFilePath, StorageError> {
        let rel = self
            .resolver
            .resolve(self, request)
            .map_err(|e| e.with_backend(BACKEND))?;

        Ok(ResolvedFilePath {
            document_path: self.resolver.document_path(&rel).to_owned(),
            path: PathBuf::from(rel),
        })
    }

    fn read(&self, file: &ResolvedFilePath) -> Result<String, StorageError> {
        let key = file.path.to_string_lossy();
        self.files
            .read()
            .unwrap()
            .get(key.as_ref())
            .cloned()
            .ok_or_else(|| Self::not_found(&file.path))
    }

    fn mtime(&self, file: &ResolvedFilePath) -> Result<f64, StorageError> {
        let key = file.path.to_string_lossy();
        if !self.files.read().unwrap().contains_key(key.as_ref()) {
            return Err(Self::not_found(&file.path));
        }
        Ok(self
            .mtimes
            .read()
            .unwrap()
            .get(key.as_ref())
            .copied()
            .unwrap_or(0.0))
    }

    fn scan(&self) -> Result<Vec<DocumentEntry>, StorageError> {
        let suffix = format!(".{}", self.resolver.config().extension);
        let files = self.files.read().unwrap();

        let mut paths: Vec<&String> = files
            .keys()
            .filter(|p| p.ends_with(&suffix))
            .filter(|p| !p.split('/').any(|seg| seg.starts_with('.')))
            .collect();
        // Same order as a directory walk: compare segment by segment
        paths.sort_by(|a, b| {
            a.split('/')
                .zip(b.split('/'))
                .map(|(x, y)| compare_ordered(x, y))
                .find(|o| o.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len()))
        });

        Ok(paths
            .into_iter()
            .map(|p| DocumentEntry {
                document_path: self.resolver.document_path(p).to_owned(),
                path: PathBuf::from(p),
            })
            .collect())
    }
}
