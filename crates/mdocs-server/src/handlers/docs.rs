//! HTML document pages.
//!
//! Wraps the rendered document body in a minimal page shell with title,
//! description and table of contents.

use std::fmt::Write;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use mdocs_renderer::escape_html;
use mdocs_site::RenderedDocument;
use mdocs_storage::DocumentRequest;

use crate::error::HtmlError;
use crate::handlers::{cache_headers, compute_etag, is_not_modified, last_modified};
use crate::state::AppState;

const STYLE: &str = "body{margin:0 auto;max-width:52rem;padding:1rem 2rem;\
                     font-family:system-ui,sans-serif;line-height:1.6}\
                     header{border-bottom:1px solid #ddd;margin-bottom:1.5rem}\
                     header a{color:inherit;text-decoration:none;font-weight:600}\
                     nav.toc{font-size:.9rem;border-left:3px solid #ddd;padding-left:1rem}\
                     pre{background:#f6f8fa;padding:1rem;overflow-x:auto}\
                     table{border-collapse:collapse}th,td{border:1px solid #ddd;padding:.3rem .6rem}";

/// Handle GET {prefix} (default document).
pub(crate) async fn get_index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, HtmlError> {
    render_page("", &state, &headers).await
}

/// Handle GET {prefix}/{path}.
pub(crate) async fn get_doc(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, HtmlError> {
    render_page(&path, &state, &headers).await
}

/// Handle GET / when documents live under a prefix.
pub(crate) async fn redirect_to_prefix(State(state): State<Arc<AppState>>) -> Redirect {
    Redirect::temporary(state.url_prefix())
}

async fn render_page(
    path: &str,
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Response, HtmlError> {
    let request = DocumentRequest::from_url_path(path);
    let doc = state.with_site(move |site| site.render(&request)).await?;

    let page = page_html(state, &doc);
    let etag = compute_etag(&state.version, &page);
    if is_not_modified(headers, &etag) {
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
    }

    Ok((cache_headers(etag, last_modified(doc.mtime)), Html(page)).into_response())
}

/// Build the full HTML page for a rendered document.
fn page_html(state: &AppState, doc: &RenderedDocument) -> String {
    let site_title = escape_html(&state.site_title);
    let home = if state.url_prefix().is_empty() {
        "/"
    } else {
        state.url_prefix()
    };

    let mut html = String::with_capacity(doc.html.len() + 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
    );
    match &doc.title {
        Some(title) => {
            writeln!(html, "<title>{} - {site_title}</title>", escape_html(title)).unwrap();
        }
        None => writeln!(html, "<title>{site_title}</title>").unwrap(),
    }
    if let Some(description) = doc.front_matter.description() {
        writeln!(
            html,
            "<meta name=\"description\" content=\"{}\">",
            escape_html(description)
        )
        .unwrap();
    }
    writeln!(html, "<style>{STYLE}</style>").unwrap();
    html.push_str("</head>\n<body>\n");

    writeln!(
        html,
        "<header><a href=\"{}\">{site_title}</a></header>",
        escape_html(home)
    )
    .unwrap();

    if !doc.toc.is_empty() {
        html.push_str("<nav class=\"toc\"><ul>\n");
        for entry in &doc.toc {
            writeln!(
                html,
                "<li class=\"toc-{}\"><a href=\"#{}\">{}</a></li>",
                entry.level,
                escape_html(&entry.id),
                escape_html(&entry.title)
            )
            .unwrap();
        }
        html.push_str("</ul></nav>\n");
    }

    html.push_str("<main>\n<article>\n");
    if let Some(title) = doc.front_matter.title()
        && state.site.config().strip_title_heading
    {
        // Body lost its first H1 to the front-matter title
        writeln!(html, "<h1>{}</h1>", escape_html(title)).unwrap();
    }
    html.push_str(&doc.html);
    html.push_str("\n</article>\n</main>\n</body>\n</html>\n");
    html
}
