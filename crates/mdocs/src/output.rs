//! Status lines for the CLI.
//!
//! Everything here goes to stderr; rendered documents and listings own stdout.

use std::fmt::Display;
use std::path::Path;

use console::{Style, Term};

pub(crate) struct Output {
    term: Term,
    label: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            label: Style::new().dim(),
        }
    }

    /// `mdocs <version>` header printed when the server starts.
    pub(crate) fn banner(&self, version: &str) {
        let line = Style::new().cyan().bold().apply_to(format!("mdocs {version}"));
        self.line(&line.to_string());
    }

    /// Indented `label: value` line under the banner.
    pub(crate) fn setting(&self, label: &str, value: impl Display) {
        self.line(&format!("  {} {value}", self.label.apply_to(format!("{label}:"))));
    }

    /// Confirms a rendered document was written to `path`.
    pub(crate) fn wrote(&self, path: &Path) {
        let line = Style::new().green().apply_to(format!("Wrote {}", path.display()));
        self.line(&line.to_string());
    }

    /// Footer after a listing.
    pub(crate) fn listed(&self, count: usize) {
        self.line(&self.label.apply_to(documents_label(count)).to_string());
    }

    pub(crate) fn error(&self, err: &dyn Display) {
        let line = Style::new().red().apply_to(format!("Error: {err}"));
        self.line(&line.to_string());
    }

    fn line(&self, text: &str) {
        // Nothing useful to do if stderr is gone
        let _ = self.term.write_line(text);
    }
}

fn documents_label(count: usize) -> String {
    match count {
        1 => "1 document".to_owned(),
        n => format!("{n} documents"),
    }
}
