//! Markdown rendering for the mdocs documentation server.
//!
//! This crate turns the raw text of a Markdown file into HTML in three
//! independent, pure steps:
//!
//! - [`parse_front_matter`] splits a leading YAML block into [`FrontMatter`]
//! - [`MarkdownRenderer`] converts the body to HTML (GFM tables, task lists,
//!   smart punctuation, bare URL links), optionally stripping the first H1
//! - [`rewrite_relative_links`] turns `./page.md` links into site-rooted links
//!
//! # Example
//!
//! ```
//! use mdocs_renderer::{MarkdownRenderer, parse_front_matter, rewrite_relative_links};
//!
//! let raw = "---\ntitle: Intro\n---\n# Intro\n\nSee [setup](./setup.md).";
//! let (meta, body) = parse_front_matter(raw);
//! let result = MarkdownRenderer::new()
//!     .with_title_stripping(meta.title().is_some())
//!     .render_markdown(body);
//! let html = rewrite_relative_links(&result.html, "guide/intro", "/docs");
//!
//! assert_eq!(html, r#"<p>See <a href="/docs/guide/setup.md">setup</a>.</p>"#);
//! ```

mod front_matter;
mod linkify;
mod links;
mod renderer;
mod state;

pub use front_matter::{FrontMatter, parse_front_matter};
pub use links::rewrite_relative_links;
pub use renderer::{MarkdownRenderer, RenderResult};
pub use state::{TocEntry, escape_html, slugify};
