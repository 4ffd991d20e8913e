//! `mdocs render` command implementation.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use mdocs_config::CliSettings;
use mdocs_site::Site;
use mdocs_storage::DocumentRequest;
use serde_json::json;

use crate::commands::{SiteArgs, open_site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Document path without the URL prefix (e.g. `guide/intro`).
    /// Omit to render the default document.
    path: Option<String>,

    #[command(flatten)]
    site: SiteArgs,

    /// Print metadata, table of contents and HTML as JSON.
    #[arg(long)]
    json: bool,

    /// Write to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if the document can't be found or rendered.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = self.site.load_config(CliSettings::default())?;
        let site = open_site(&config);
        let path = self.path.as_deref().unwrap_or_default();
        let text = render_document(&site, path, self.json)?;

        match self.output {
            Some(path) => {
                std::fs::write(&path, text)?;
                Output::new().wrote(&path);
            }
            None => io::stdout().lock().write_all(text.as_bytes())?,
        }

        Ok(())
    }
}

/// Render one document as HTML or JSON text.
fn render_document(site: &Site, path: &str, as_json: bool) -> Result<String, CliError> {
    let doc = site.render(&DocumentRequest::from_url_path(path))?;

    let mut text = if as_json {
        serde_json::to_string_pretty(&json!({
            "title": doc.title,
            "path": doc.document_path,
            "sourceFile": doc.source_path.display().to_string(),
            "frontMatter": doc.front_matter,
            "toc": doc.toc,
            "html": doc.html,
        }))?
    } else {
        doc.html
    };
    text.push('\n');
    Ok(text)
}
