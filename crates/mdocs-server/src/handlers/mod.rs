//! HTTP request handlers.

pub(crate) mod docs;
pub(crate) mod documents;
pub(crate) mod pages;

use std::time::{Duration, UNIX_EPOCH};

use axum::http::header::HeaderName;
use axum::http::{HeaderMap, header};
use chrono::{DateTime, Utc};
use md5::{Digest, Md5};

/// Convert internal path (without leading slash) to URL path (with leading slash).
///
/// The site stores paths without leading slashes (e.g., "guide", "domain/page", "" for root),
/// but clients expect URL paths with leading slashes (e.g., "/guide", "/domain/page", "/").
pub(crate) fn to_url_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_owned()
    } else {
        format!("/{path}")
    }
}

/// Compute `ETag` from version and content.
///
/// Uses MD5 hash truncated to 64 bits (16 hex chars) - sufficient for
/// cache invalidation with negligible collision probability.
pub(crate) fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}

/// Check `If-None-Match` against the current `ETag`.
pub(crate) fn is_not_modified(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .any(|candidate| candidate == "*" || candidate == etag)
}

/// Source modification time as a UTC timestamp.
///
/// Invalid timestamps (negative, NaN) fall back to the Unix epoch.
pub(crate) fn last_modified(mtime: f64) -> DateTime<Utc> {
    let offset = Duration::try_from_secs_f64(mtime).unwrap_or_default();
    (UNIX_EPOCH + offset).into()
}

/// `ETag`, `Last-Modified` and `Cache-Control` headers for a rendered page.
pub(crate) fn cache_headers(
    etag: String,
    last_modified: DateTime<Utc>,
) -> [(HeaderName, String); 3] {
    [
        (header::ETAG, etag),
        (
            header::LAST_MODIFIED,
            last_modified
                .format("%a, %d %b %Y %H:%M:%S GMT")
                .to_string(),
        ),
        (header::CACHE_CONTROL, "private, max-age=60".to_owned()),
    ]
}
