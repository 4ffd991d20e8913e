//! Error types for the HTTP server.

use std::fmt::Write;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use mdocs_renderer::escape_html;
use mdocs_site::SiteError;
use serde_json::json;

/// Server error type.
///
/// Renders as a JSON body. Page routes wrap it in [`HtmlError`] instead.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// No document at the given path.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// Rendering did not finish in time.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Unexpected failure while serving the request.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SiteError> for ServerError {
    fn from(err: SiteError) -> Self {
        match err {
            SiteError::NotFound(path) => Self::PageNotFound(path),
            SiteError::Server(message) => Self::Internal(message),
        }
    }
}

impl ServerError {
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            Self::PageNotFound(_) => StatusCode::NOT_FOUND,
            Self::Timeout(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Internal details stay in the logs.
    fn message(&self) -> &'static str {
        match self {
            Self::PageNotFound(_) => "Page not found",
            Self::Timeout(_) | Self::Internal(_) => "Internal server error",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let body = match &self {
            Self::PageNotFound(path) => json!({"error": self.message(), "path": path}),
            Self::Timeout(_) | Self::Internal(_) => json!({"error": self.message()}),
        };

        (self.status(), axum::Json(body)).into_response()
    }
}

/// [`ServerError`] rendered as an HTML page.
#[derive(Debug)]
pub(crate) struct HtmlError(pub(crate) ServerError);

impl From<ServerError> for HtmlError {
    fn from(err: ServerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for HtmlError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        let message = self.0.message();

        let mut html = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        writeln!(html, "<title>{message}</title>\n</head>\n<body>").unwrap();
        writeln!(html, "<h1>{}</h1>", status.as_u16()).unwrap();
        write!(html, "<p>{message}").unwrap();
        if let ServerError::PageNotFound(path) = &self.0 {
            write!(html, ": <code>{}</code>", escape_html(path)).unwrap();
        }
        html.push_str("</p>\n</body>\n</html>\n");

        (status, Html(html)).into_response()
    }
}
