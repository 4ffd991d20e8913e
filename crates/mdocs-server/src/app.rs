//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        .route("/api/pages/", get(handlers::pages::get_root_page))
        .route("/api/pages/{*path}", get(handlers::pages::get_page))
        .route("/api/documents", get(handlers::documents::list_documents));

    // HTML pages under the prefix; the root redirects there
    let prefix = state.url_prefix();
    let page_routes = if prefix.is_empty() {
        Router::new()
            .route("/", get(handlers::docs::get_index))
            .route("/{*path}", get(handlers::docs::get_doc))
    } else {
        Router::new()
            .route("/", get(handlers::docs::redirect_to_prefix))
            .route(prefix, get(handlers::docs::get_index))
            .route(&format!("{prefix}/"), get(handlers::docs::get_index))
            .route(&format!("{prefix}/{{*path}}"), get(handlers::docs::get_doc))
    };

    Router::new()
        .merge(api_routes)
        .merge(page_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use mdocs_site::{Site, SiteConfig};
    use mdocs_storage::{
        DocumentEntry, DocumentRequest, MockStorage, ResolvedFilePath, Storage, StorageError,
    };
    use pretty_assertions::assert_eq;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    fn fixture() -> MockStorage {
        MockStorage::new()
            .with_file("getting-started/README.md", "# Welcome\n\nStart here.")
            .with_file(
                "guide/intro.md",
                "---\ntitle: Introduction\ndescription: First <steps>\n---\n# Introduction\n\n## Setup\n\nSee [setup](./setup.md).",
            )
            .with_file("guide/setup.md", "# Setup")
            .with_file("drafts.md", "---\ntitle: Drafts\npublished: false\n---\n")
            .with_mtime("guide/intro.md", 1_700_000_000.0)
    }

    fn router_with(
        storage: impl Storage + 'static,
        url_prefix: &str,
        request_timeout: Option<Duration>,
    ) -> Router {
        let site_config = SiteConfig {
            url_prefix: url_prefix.to_owned(),
            ..SiteConfig::default()
        };
        let state = Arc::new(AppState {
            site: Arc::new(Site::new(Arc::new(storage), site_config)),
            site_title: "Team Docs".to_owned(),
            request_timeout,
            version: "1.0.0".to_owned(),
        });
        create_router(state)
    }

    fn router() -> Router {
        router_with(fixture(), "/docs", Some(Duration::from_secs(5)))
    }

    async fn fetch(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_str(&body_string(response).await).unwrap()
    }

    fn header_value<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
        response.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[tokio::test]
    async fn test_html_page() {
        let response = fetch(router(), "/docs/guide/intro").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            header_value(&response, "content-type")
                .unwrap()
                .starts_with("text/html")
        );
        assert_eq!(
            header_value(&response, "last-modified"),
            Some("Tue, 14 Nov 2023 22:13:20 GMT")
        );

        let body = body_string(response).await;
        assert!(body.contains("<title>Introduction - Team Docs</title>"));
        assert!(body.contains(r#"<meta name="description" content="First &lt;steps&gt;">"#));
        assert!(body.contains("<h1>Introduction</h1>"));
        assert!(!body.contains(r#"<h1 id="introduction">"#));
        assert!(body.contains(r##"<a href="#setup">Setup</a>"##));
        assert!(body.contains(r#"<a href="/docs/guide/setup.md">setup</a>"#));
    }

    #[tokio::test]
    async fn test_security_headers_present() {
        let response = fetch(router(), "/docs/guide/intro").await;

        assert!(header_value(&response, "content-security-policy").is_some());
        assert_eq!(header_value(&response, "x-content-type-options"), Some("nosniff"));
        assert_eq!(header_value(&response, "x-frame-options"), Some("DENY"));
    }

    #[tokio::test]
    async fn test_prefix_serves_default_document() {
        for uri in ["/docs", "/docs/"] {
            let response = fetch(router(), uri).await;
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
            assert!(body_string(response).await.contains("Start here."));
        }
    }

    #[tokio::test]
    async fn test_root_redirects_to_prefix() {
        let response = fetch(router(), "/").await;

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(header_value(&response, "location"), Some("/docs"));
    }

    #[tokio::test]
    async fn test_missing_page_is_html_404() {
        let response = fetch(router(), "/docs/nonexistent/page").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(
            header_value(&response, "content-type")
                .unwrap()
                .starts_with("text/html")
        );
        assert!(body_string(response).await.contains("nonexistent/page"));
    }

    #[tokio::test]
    async fn test_traversal_is_404() {
        let response = fetch(router(), "/docs/../drafts").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = fetch(router(), "/api/pages/guide/%2E%2E/drafts").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_api_page() {
        let response = fetch(router(), "/api/pages/guide/intro").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(header_value(&response, "etag").is_some());
        assert_eq!(
            header_value(&response, "cache-control"),
            Some("private, max-age=60")
        );

        let json = body_json(response).await;
        assert_eq!(json["meta"]["title"], "Introduction");
        assert_eq!(json["meta"]["path"], "/guide/intro");
        assert_eq!(json["meta"]["description"], "First <steps>");
        assert_eq!(json["toc"][0]["id"], "setup");
        assert_eq!(
            json["content"],
            r#"<h2 id="setup">Setup</h2><p>See <a href="/docs/guide/setup.md">setup</a>.</p>"#
        );
    }

    #[tokio::test]
    async fn test_api_root_page_is_default_document() {
        let response = fetch(router(), "/api/pages/").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["meta"]["path"], "/");
        assert_eq!(json["meta"]["documentPath"], "getting-started/README");
    }

    #[tokio::test]
    async fn test_api_missing_page_is_json_404() {
        let response = fetch(router(), "/api/pages/nonexistent/page").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Page not found", "path": "nonexistent/page"})
        );
    }

    #[tokio::test]
    async fn test_etag_not_modified() {
        let first = fetch(router(), "/api/pages/guide/setup").await;
        let etag = header_value(&first, "etag").unwrap().to_owned();

        let request = Request::builder()
            .uri("/api/pages/guide/setup")
            .header(header::IF_NONE_MATCH, &etag)
            .body(Body::empty())
            .unwrap();
        let second = router().oneshot(request).await.unwrap();

        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(header_value(&second, "etag"), Some(etag.as_str()));
        assert!(body_string(second).await.is_empty());
    }

    #[tokio::test]
    async fn test_html_etag_not_modified() {
        let first = fetch(router(), "/docs/guide/setup").await;
        let etag = header_value(&first, "etag").unwrap().to_owned();

        let request = Request::builder()
            .uri("/docs/guide/setup")
            .header(header::IF_NONE_MATCH, &etag)
            .body(Body::empty())
            .unwrap();
        let second = router().oneshot(request).await.unwrap();

        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_documents_listing() {
        let response = fetch(router(), "/api/documents").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let paths: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["path"].as_str().unwrap())
            .collect();
        assert_eq!(
            paths,
            ["getting-started/README", "guide/intro", "guide/setup"]
        );
        assert_eq!(json[1]["title"], "Introduction");
        assert_eq!(json[1]["url"], "/docs/guide/intro");
    }

    #[tokio::test]
    async fn test_documents_search() {
        let response = fetch(router(), "/api/documents?search=INTRO").await;

        let json = body_json(response).await;
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["path"], "guide/intro");
    }

    #[tokio::test]
    async fn test_empty_prefix_serves_from_root() {
        let app = router_with(fixture(), "", None);

        let response = fetch(app.clone(), "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("Start here."));

        let response = fetch(app.clone(), "/guide/intro").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            body_string(response)
                .await
                .contains(r#"<a href="/guide/setup.md">setup</a>"#)
        );

        let response = fetch(app, "/api/pages/guide/setup").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    /// Storage whose reads take longer than any test timeout.
    struct SlowStorage(MockStorage);

    impl Storage for SlowStorage {
        fn resolve(&self, request: &DocumentRequest) -> Result<ResolvedFilePath, StorageError> {
            self.0.resolve(request)
        }

        fn read(&self, file: &ResolvedFilePath) -> Result<String, StorageError> {
            std::thread::sleep(Duration::from_millis(300));
            self.0.read(file)
        }

        fn mtime(&self, file: &ResolvedFilePath) -> Result<f64, StorageError> {
            self.0.mtime(file)
        }

        fn scan(&self) -> Result<Vec<DocumentEntry>, StorageError> {
            self.0.scan()
        }
    }

    /// Storage whose files exist but can't be read.
    struct UnreadableStorage(MockStorage);

    impl Storage for UnreadableStorage {
        fn resolve(&self, request: &DocumentRequest) -> Result<ResolvedFilePath, StorageError> {
            self.0.resolve(request)
        }

        fn read(&self, file: &ResolvedFilePath) -> Result<String, StorageError> {
            Err(StorageError::io(
                io::Error::from(io::ErrorKind::PermissionDenied),
                &file.path,
            ))
        }

        fn mtime(&self, file: &ResolvedFilePath) -> Result<f64, StorageError> {
            self.0.mtime(file)
        }

        fn scan(&self) -> Result<Vec<DocumentEntry>, StorageError> {
            self.0.scan()
        }
    }

    #[tokio::test]
    async fn test_unreadable_document_is_500() {
        let app = router_with(
            UnreadableStorage(MockStorage::new().with_file("x.md", "# X")),
            "/docs",
            None,
        );

        let response = fetch(app.clone(), "/api/pages/x").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Internal server error"})
        );

        let response = fetch(app, "/docs/x").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            header_value(&response, "content-type")
                .unwrap()
                .starts_with("text/html")
        );
    }

    #[tokio::test]
    async fn test_request_timeout_is_500() {
        let app = router_with(
            SlowStorage(fixture()),
            "/docs",
            Some(Duration::from_millis(20)),
        );

        let response = fetch(app.clone(), "/api/pages/guide/setup").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Internal server error"})
        );

        let response = fetch(app, "/docs/guide/setup").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
