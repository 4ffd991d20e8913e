//! Request-to-file resolution shared by all storage backends.
//!
//! Resolution steps for a [`DocumentRequest`]:
//!
//! 1. Empty request → configured default path.
//! 2. Last segment without the Markdown extension: if the joined path is a
//!    directory append the default filename, otherwise treat it as a slug.
//! 3. Append the extension.
//! 4. Candidate is a file → done. Candidate is a directory (or the default
//!    file of a directory is missing) → first Markdown file of that
//!    directory by numeric prefix. Nothing found → not found.

use std::cmp::Ordering;

use crate::storage::{DocumentRequest, StorageError, StorageErrorKind};

/// What a relative path points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryKind {
    File,
    Dir,
}

/// Minimal view of a document tree, relative to its root.
///
/// Paths use `/` separators and never start with `/`; `""` is the root.
pub(crate) trait Tree {
    /// Kind of the entry at `rel`, `None` if it doesn't exist.
    fn entry_kind(&self, rel: &str) -> Result<Option<EntryKind>, StorageError>;

    /// Names of the non-hidden files in directory `rel` ending in `.{extension}`.
    fn markdown_files(&self, rel: &str, extension: &str) -> Result<Vec<String>, StorageError>;
}

/// Naming conventions used during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Document served for an empty request.
    pub default_path: String,
    /// File (without extension) served for a directory request.
    pub default_filename: String,
    /// Markdown extension without the leading dot.
    pub extension: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_path: "getting-started/README".to_owned(),
            default_filename: "README".to_owned(),
            extension: "md".to_owned(),
        }
    }
}

/// Resolves requests against a [`Tree`].
#[derive(Debug, Clone)]
pub(crate) struct Resolver {
    config: ResolverConfig,
    suffix: String,
}

impl Resolver {
    pub(crate) fn new(config: ResolverConfig) -> Self {
        let suffix = format!(".{}", config.extension);
        Self { config, suffix }
    }

    pub(crate) fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Strip the Markdown extension from a relative file path.
    pub(crate) fn document_path<'a>(&self, rel: &'a str) -> &'a str {
        rel.strip_suffix(self.suffix.as_str()).unwrap_or(rel)
    }

    /// Resolve a request to a relative file path.
    pub(crate) fn resolve(
        &self,
        tree: &impl Tree,
        request: &DocumentRequest,
    ) -> Result<String, StorageError> {
        if request.has_traversal() {
            return Err(StorageError::new(StorageErrorKind::InvalidPath).with_path(request.joined()));
        }

        let joined = if request.is_empty() {
            self.config.default_path.trim_matches('/').to_owned()
        } else {
            request.joined()
        };

        // Directory whose default file we are looking for, if any.
        let mut directory = None;
        let candidate = if joined.ends_with(&self.suffix) {
            joined
        } else {
            let base = if tree.entry_kind(&joined)? == Some(EntryKind::Dir) {
                let with_default = join_rel(&joined, &self.config.default_filename);
                directory = Some(joined);
                with_default
            } else {
                joined
            };
            format!("{base}{}", self.suffix)
        };

        tracing::debug!(candidate = %candidate, "Resolving document");

        match tree.entry_kind(&candidate)? {
            Some(EntryKind::File) => Ok(candidate),
            Some(EntryKind::Dir) => self.first_in_directory(tree, &candidate),
            None => match directory {
                Some(dir) => self.first_in_directory(tree, &dir),
                None => Err(StorageError::not_found(candidate)),
            },
        }
    }

    /// Pick the first Markdown file of a directory by numeric prefix.
    fn first_in_directory(&self, tree: &impl Tree, dir: &str) -> Result<String, StorageError> {
        let mut names = tree.markdown_files(dir, &self.config.extension)?;
        names.sort_by(|a, b| compare_ordered(a, b));
        names
            .first()
            .map(|name| join_rel(dir, name))
            .ok_or_else(|| StorageError::not_found(dir))
    }
}

/// Join two relative path fragments with `/`.
pub(crate) fn join_rel(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_owned()
    } else {
        format!("{dir}/{name}")
    }
}

/// Leading decimal number of a name (`"01_Start.md"` → `Some(1)`).
pub(crate) fn numeric_prefix(name: &str) -> Option<u64> {
    let end = name
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(name.len());
    name[..end].parse().ok()
}

/// Order names by numeric prefix; names without one sort last, ties by name.
pub(crate) fn compare_ordered(a: &str, b: &str) -> Ordering {
    match (numeric_prefix(a), numeric_prefix(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}
