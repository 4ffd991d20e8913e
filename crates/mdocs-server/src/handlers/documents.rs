//! Document listing API endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use mdocs_site::DocumentSummary;
use serde::{Deserialize, Serialize};

use crate::error::ServerError;
use crate::state::AppState;

/// Query parameters for GET /api/documents.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct DocumentsQuery {
    /// Case-insensitive substring filter over path and title.
    search: Option<String>,
}

/// Listing entry with its page URL.
#[derive(Serialize)]
pub(crate) struct DocumentResponse {
    #[serde(flatten)]
    summary: DocumentSummary,
    url: String,
}

/// Handle GET /api/documents.
pub(crate) async fn list_documents(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DocumentsQuery>,
) -> Result<Json<Vec<DocumentResponse>>, ServerError> {
    let documents = state
        .with_site(move |site| site.documents(query.search.as_deref()))
        .await?;

    let prefix = state.url_prefix();
    Ok(Json(
        documents
            .into_iter()
            .map(|summary| DocumentResponse {
                url: format!("{prefix}/{}", summary.path),
                summary,
            })
            .collect(),
    ))
}
