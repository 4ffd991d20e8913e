//! Document listing and search.

use mdocs_renderer::parse_front_matter;
use mdocs_storage::{DocumentEntry, ResolvedFilePath};
use serde::Serialize;

use crate::site::{Site, SiteError};

/// Listing entry for a published document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    /// Path relative to the content root, without extension.
    pub path: String,
    /// Front-matter title, else the file stem.
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl DocumentSummary {
    /// Case-insensitive substring match over path and title.
    fn matches(&self, needle: &str) -> bool {
        self.path.to_lowercase().contains(needle) || self.title.to_lowercase().contains(needle)
    }
}

impl Site {
    /// List published documents, optionally filtered by a search term.
    ///
    /// Documents are returned in directory-walk order (numeric prefixes
    /// first). Files marked `published: false` are left out but can still be
    /// rendered directly. Unreadable files are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Server`] if the content root can't be listed.
    pub fn documents(&self, search: Option<&str>) -> Result<Vec<DocumentSummary>, SiteError> {
        let entries = self.storage().scan().map_err(|e| {
            tracing::error!(error = %e, "Failed to list documents");
            SiteError::Server(e.to_string())
        })?;

        let needle = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        Ok(entries
            .into_iter()
            .filter_map(|entry| self.summarize(entry))
            .filter(|summary| needle.as_deref().is_none_or(|n| summary.matches(n)))
            .collect())
    }

    fn summarize(&self, entry: DocumentEntry) -> Option<DocumentSummary> {
        let file = ResolvedFilePath {
            path: entry.path,
            document_path: entry.document_path,
        };
        let raw = match self.storage().read(&file) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(
                    path = %file.document_path,
                    error = %e,
                    "Skipping unreadable document"
                );
                return None;
            }
        };

        let (front_matter, _) = parse_front_matter(&raw);
        if !front_matter.is_published() {
            return None;
        }

        let title = front_matter.title().map_or_else(
            || file_stem(&file.document_path).to_owned(),
            str::to_owned,
        );

        Some(DocumentSummary {
            title,
            description: front_matter.description().map(str::to_owned),
            icon: front_matter.icon().map(str::to_owned),
            order: front_matter.order(),
            path: file.document_path,
        })
    }
}

fn file_stem(document_path: &str) -> &str {
    document_path
        .rsplit_once('/')
        .map_or(document_path, |(_, stem)| stem)
}
