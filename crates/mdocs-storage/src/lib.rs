//! Storage abstraction for the mdocs documentation server.
//!
//! This crate turns URL path segments into Markdown files and reads them
//! back. Resolution rules are shared by every backend:
//!
//! - Empty request resolves to the configured default document
//! - Directory request resolves to its `README`, or to the first file by
//!   numeric prefix (`01_Start.md` before `02_Intro.md`)
//! - Traversal segments (`..`) are rejected before touching the backend
//!
//! # Architecture
//!
//! - [`Storage`] trait with `resolve()`, `read()`, `mtime()` and `scan()`
//! - [`FsStorage`] implementation for a directory on disk
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use mdocs_storage::{DocumentRequest, FsStorage, Storage};
//!
//! let storage = FsStorage::new(PathBuf::from("docs"));
//! let file = storage.resolve(&DocumentRequest::from_url_path("guide"))?;
//! println!("{}: {}", file.document_path, file.path.display());
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod resolver;
mod storage;

pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use resolver::ResolverConfig;
pub use storage::{
    DocumentEntry, DocumentRequest, ResolvedFilePath, Storage, StorageError, StorageErrorKind,
};
