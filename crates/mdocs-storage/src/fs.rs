//! Filesystem storage backend.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::resolver::{EntryKind, Resolver, ResolverConfig, Tree, compare_ordered, join_rel};
use crate::storage::{DocumentEntry, DocumentRequest, ResolvedFilePath, Storage, StorageError};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem storage rooted at a source directory.
///
/// # Example
///
/// ```no_run
/// use std::path::PathBuf;
/// use mdocs_storage::{DocumentRequest, FsStorage, Storage};
///
/// let storage = FsStorage::new(PathBuf::from("docs"));
/// let file = storage.resolve(&DocumentRequest::from_url_path("guide/intro"))?;
/// let markdown = storage.read(&file)?;
/// # Ok::<(), mdocs_storage::StorageError>(())
/// ```
#[derive(Debug)]
pub struct FsStorage {
    /// Root directory of the Markdown tree.
    source_dir: PathBuf,
    resolver: Resolver,
}

impl FsStorage {
    /// Create a filesystem storage with default naming conventions.
    #[must_use]
    pub fn new(source_dir: PathBuf) -> Self {
        Self::with_config(source_dir, ResolverConfig::default())
    }

    /// Create a filesystem storage with custom naming conventions.
    #[must_use]
    pub fn with_config(source_dir: PathBuf, config: ResolverConfig) -> Self {
        Self {
            source_dir,
            resolver: Resolver::new(config),
        }
    }

    /// Root directory of the Markdown tree.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    fn absolute(&self, rel: &str) -> PathBuf {
        if rel.is_empty() {
            self.source_dir.clone()
        } else {
            self.source_dir.join(rel)
        }
    }

    fn io_error(err: io::Error, path: &Path) -> StorageError {
        StorageError::io(err, path).with_backend(BACKEND)
    }

    /// Recursively collect Markdown files of `rel`, ordered per directory.
    fn scan_directory(&self, rel: &str, out: &mut Vec<DocumentEntry>) -> Result<(), StorageError> {
        let dir = self.absolute(rel);
        let entries = fs::read_dir(&dir).map_err(|e| Self::io_error(e, &dir))?;

        let mut children: Vec<(String, bool)> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                let is_dir = entry.file_type().ok()?.is_dir();
                (!name.starts_with('.')).then_some((name, is_dir))
            })
            .collect();
        children.sort_by(|(a, _), (b, _)| compare_ordered(a, b));

        let extension = &self.resolver.config().extension;
        for (name, is_dir) in children {
            let child = join_rel(rel, &name);
            if is_dir {
                // Unreadable subdirectories are skipped, not fatal for the listing
                if let Err(e) = self.scan_directory(&child, out) {
                    tracing::warn!(path = %child, error = %e, "Skipping unreadable directory");
                }
            } else if has_extension(&name, extension) {
                out.push(DocumentEntry {
                    document_path: self.resolver.document_path(&child).to_owned(),
                    path: self.absolute(&child),
                });
            }
        }

        Ok(())
    }
}

/// True if `name` ends with `.{extension}` and has a non-empty stem.
fn has_extension(name: &str, extension: &str) -> bool {
    name.strip_suffix(extension)
        .and_then(|stem| stem.strip_suffix('.'))
        .is_some_and(|stem| !stem.is_empty())
}

impl Tree for FsStorage {
    fn entry_kind(&self, rel: &str) -> Result<Option<EntryKind>, StorageError> {
        let path = self.absolute(rel);
        match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => Ok(Some(EntryKind::Dir)),
            Ok(meta) if meta.is_file() => Ok(Some(EntryKind::File)),
            Ok(_) => Ok(None),
            // A file used as a directory component (`page.md/x`) is just missing
            Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
                Ok(None)
            }
            Err(e) => Err(Self::io_error(e, &path)),
        }
    }

    fn markdown_files(&self, rel: &str, extension: &str) -> Result<Vec<String>, StorageError> {
        let dir = self.absolute(rel);
        let entries = fs::read_dir(&dir).map_err(|e| Self::io_error(e, &dir))?;

        Ok(entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| !name.starts_with('.') && has_extension(name, extension))
            .collect())
    }
}

impl Storage for FsStorage {
    fn resolve(&self, request: &DocumentRequest) -> Result<ResolvedFilePath, StorageError> {
        let rel = self
            .resolver
            .resolve(self, request)
            .map_err(|e| e.with_backend(BACKEND))?;

        Ok(ResolvedFilePath {
            path: self.absolute(&rel),
            document_path: self.resolver.document_path(&rel).to_owned(),
        })
    }

    fn read(&self, file: &ResolvedFilePath) -> Result<String, StorageError> {
        fs::read_to_string(&file.path).map_err(|e| Self::io_error(e, &file.path))
    }

    fn mtime(&self, file: &ResolvedFilePath) -> Result<f64, StorageError> {
        let modified = fs::metadata(&file.path)
            .and_then(|m| m.modified())
            .map_err(|e| Self::io_error(e, &file.path))?;
        Ok(modified
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |d| d.as_secs_f64()))
    }

    fn scan(&self) -> Result<Vec<DocumentEntry>, StorageError> {
        let mut entries = Vec::new();
        if self.source_dir.is_dir() {
            self.scan_directory("", &mut entries)?;
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageErrorKind;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_fs_storage_is_send_sync() {
        assert_send_sync::<FsStorage>();
    }

    fn create_test_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn resolve(storage: &FsStorage, url: &str) -> Result<ResolvedFilePath, StorageError> {
        storage.resolve(&DocumentRequest::from_url_path(url))
    }

    #[test]
    fn test_resolve_existing_file_ends_with_extension() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "guide/intro.md", "# Intro");

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let file = resolve(&storage, "guide/intro").unwrap();

        assert_eq!(file.path, temp_dir.path().join("guide/intro.md"));
        assert!(file.path.to_string_lossy().ends_with(".md"));
        assert_eq!(file.document_path, "guide/intro");
    }

    #[test]
    fn test_resolve_empty_request_uses_default_path() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "getting-started/README.md", "# Welcome");

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let file = resolve(&storage, "").unwrap();

        assert_eq!(file.document_path, "getting-started/README");
    }

    #[test]
    fn test_resolve_directory_readme() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "guide/README.md", "# Guide");
        write(temp_dir.path(), "guide/01_setup.md", "# Setup");

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let file = resolve(&storage, "guide").unwrap();

        assert_eq!(file.path, temp_dir.path().join("guide/README.md"));
        assert_eq!(file.document_path, "guide/README");
    }

    #[test]
    fn test_resolve_directory_numeric_ordering() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "01_Getting_Started/02_Intro.md", "# Intro");
        write(temp_dir.path(), "01_Getting_Started/01_Start.md", "# Start");
        write(temp_dir.path(), "01_Getting_Started/notes.md", "# Notes");

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let file = resolve(&storage, "01_Getting_Started").unwrap();

        assert_eq!(
            file.path,
            temp_dir.path().join("01_Getting_Started/01_Start.md")
        );
    }

    #[test]
    fn test_resolve_candidate_is_directory() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "api.md/02_Intro.md", "# Intro");
        write(temp_dir.path(), "api.md/01_Start.md", "# Start");

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let file = resolve(&storage, "api.md").unwrap();

        assert_eq!(file.path, temp_dir.path().join("api.md/01_Start.md"));
    }

    #[test]
    fn test_resolve_empty_directory_not_found() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "assets/logo.png", "png");

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let err = resolve(&storage, "assets").unwrap_err();

        assert_eq!(err.kind(), StorageErrorKind::NotFound);
        assert_eq!(err.backend(), Some("Fs"));
    }

    #[test]
    fn test_resolve_nonexistent_page() {
        let temp_dir = create_test_dir();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let err = resolve(&storage, "nonexistent/page").unwrap_err();

        assert_eq!(err.kind(), StorageErrorKind::NotFound);
    }

    #[test]
    fn test_resolve_through_file_component_not_found() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "guide.md", "# Guide");

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let err = resolve(&storage, "guide.md/child").unwrap_err();

        assert!(err.is_not_found());
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "docs/page.md", "# Page");
        write(temp_dir.path(), "secret.md", "top secret");

        let storage = FsStorage::new(temp_dir.path().join("docs"));
        let err = resolve(&storage, "../secret").unwrap_err();

        assert_eq!(err.kind(), StorageErrorKind::InvalidPath);
    }

    #[test]
    fn test_resolve_custom_conventions() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "home/index.markdown", "# Home");

        let storage = FsStorage::with_config(
            temp_dir.path().to_path_buf(),
            ResolverConfig {
                default_path: "home".to_owned(),
                default_filename: "index".to_owned(),
                extension: "markdown".to_owned(),
            },
        );
        let file = resolve(&storage, "").unwrap();

        assert_eq!(file.path, temp_dir.path().join("home/index.markdown"));
        assert_eq!(file.document_path, "home/index");
    }

    #[test]
    fn test_read_resolved_file() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "guide.md", "# Guide\n\nContent here.");

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let file = resolve(&storage, "guide").unwrap();

        assert_eq!(storage.read(&file).unwrap(), "# Guide\n\nContent here.");
    }

    #[test]
    fn test_read_vanished_file() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "guide.md", "# Guide");

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let file = resolve(&storage, "guide").unwrap();
        fs::remove_file(&file.path).unwrap();

        let err = storage.read(&file).unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::NotFound);
    }

    #[test]
    fn test_mtime_returns_modification_time() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "guide.md", "# Guide");

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let file = resolve(&storage, "guide").unwrap();

        assert!(storage.mtime(&file).unwrap() > 0.0);
    }

    #[test]
    fn test_scan_orders_and_skips_hidden() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "02_Guide/02_b.md", "b");
        write(temp_dir.path(), "02_Guide/01_a.md", "a");
        write(temp_dir.path(), "01_Intro.md", "intro");
        write(temp_dir.path(), "zz.md", "zz");
        write(temp_dir.path(), ".hidden/x.md", "x");
        write(temp_dir.path(), ".draft.md", "draft");
        write(temp_dir.path(), "image.png", "png");

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let paths: Vec<_> = storage
            .scan()
            .unwrap()
            .into_iter()
            .map(|e| e.document_path)
            .collect();

        assert_eq!(paths, ["01_Intro", "02_Guide/01_a", "02_Guide/02_b", "zz"]);
    }

    #[test]
    fn test_scan_missing_dir() {
        let storage = FsStorage::new(PathBuf::from("/nonexistent"));
        assert!(storage.scan().unwrap().is_empty());
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension("intro.md", "md"));
        assert!(!has_extension(".md", "md"));
        assert!(!has_extension("intromd", "md"));
        assert!(!has_extension("intro.markdown", "md"));
    }
}
