//! Pages API endpoint.
//!
//! Handles page rendering and returns JSON responses with metadata,
//! table of contents, and HTML content.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use mdocs_site::{FrontMatter, RenderedDocument, TocEntry};
use mdocs_storage::DocumentRequest;
use serde::Serialize;

use crate::error::ServerError;
use crate::handlers::{cache_headers, compute_etag, is_not_modified, last_modified, to_url_path};
use crate::state::AppState;

/// Response for GET /api/pages/{path}.
#[derive(Serialize)]
struct PageResponse {
    /// Page metadata.
    meta: PageMeta,
    /// Table of contents entries.
    toc: Vec<TocEntry>,
    /// Rendered HTML content.
    content: String,
}

/// Page metadata.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageMeta {
    /// Page title (from front-matter or first H1).
    title: Option<String>,
    /// URL path.
    path: String,
    /// Resolved document path, relative to the content root.
    document_path: String,
    /// Source file path.
    source_file: String,
    /// Last modification time (ISO 8601).
    last_modified: String,
    /// Page description (from front-matter).
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Full front-matter mapping.
    #[serde(skip_serializing_if = "FrontMatter::is_empty")]
    front_matter: FrontMatter,
}

impl PageResponse {
    fn new(doc: RenderedDocument) -> Self {
        Self {
            meta: PageMeta {
                title: doc.title,
                path: to_url_path(&doc.request_path),
                document_path: doc.document_path,
                source_file: doc.source_path.display().to_string(),
                last_modified: last_modified(doc.mtime).to_rfc3339(),
                description: doc.front_matter.description().map(str::to_owned),
                front_matter: doc.front_matter,
            },
            toc: doc.toc,
            content: doc.html,
        }
    }
}

/// Handle GET /api/pages/ (default page).
pub(crate) async fn get_root_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    get_page_impl("", &state, &headers).await
}

/// Handle GET /api/pages/{path}.
pub(crate) async fn get_page(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    get_page_impl(&path, &state, &headers).await
}

/// Shared implementation for page rendering.
async fn get_page_impl(
    path: &str,
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Response, ServerError> {
    let request = DocumentRequest::from_url_path(path);
    let doc = state.with_site(move |site| site.render(&request)).await?;

    let etag = compute_etag(&state.version, &doc.html);
    if is_not_modified(headers, &etag) {
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
    }

    let modified = last_modified(doc.mtime);
    Ok((cache_headers(etag, modified), Json(PageResponse::new(doc))).into_response())
}
