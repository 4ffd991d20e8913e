//! Document pipeline for the mdocs documentation server.
//!
//! [`Site`] ties storage and rendering together: a request path is resolved
//! to a Markdown file, its front-matter is parsed, the body is rendered and
//! relative links are rewritten under the site prefix.
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use mdocs_site::{Site, SiteConfig};
//! use mdocs_storage::FsStorage;
//!
//! let storage = Arc::new(FsStorage::new(PathBuf::from("docs")));
//! let site = Site::new(storage, SiteConfig::default());
//!
//! let document = site.resolve_and_render(&["getting-started", "installation"])?;
//! println!("{}", document.html);
//! # Ok(())
//! # }
//! ```

mod documents;
mod site;

pub use documents::DocumentSummary;
pub use site::{RenderedDocument, Site, SiteConfig, SiteError};

// Re-exported for consumers rendering documents
pub use mdocs_renderer::{FrontMatter, TocEntry};
