//! `mdocs list` command implementation.

use std::fmt::Write as _;
use std::io::{self, Write};

use clap::Args;
use mdocs_config::CliSettings;
use mdocs_site::DocumentSummary;

use crate::commands::{SiteArgs, open_site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the list command.
#[derive(Args)]
pub(crate) struct ListArgs {
    #[command(flatten)]
    site: SiteArgs,

    /// Only list documents whose path or title contains this text.
    #[arg(long)]
    search: Option<String>,

    /// Print the listing as JSON.
    #[arg(long)]
    json: bool,
}

impl ListArgs {
    /// Execute the list command.
    ///
    /// # Errors
    ///
    /// Returns an error if the source directory can't be listed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = self.site.load_config(CliSettings::default())?;
        let documents = open_site(&config).documents(self.search.as_deref())?;

        let text = format_listing(&documents, self.json)?;
        io::stdout().lock().write_all(text.as_bytes())?;

        Output::new().listed(documents.len());
        Ok(())
    }
}

/// One `path<TAB>title` line per document, or a JSON array.
fn format_listing(documents: &[DocumentSummary], as_json: bool) -> Result<String, CliError> {
    if as_json {
        let mut text = serde_json::to_string_pretty(documents)?;
        text.push('\n');
        return Ok(text);
    }

    let mut text = String::new();
    for document in documents {
        writeln!(text, "{}\t{}", document.path, document.title).unwrap();
    }
    Ok(text)
}
