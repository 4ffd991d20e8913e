//! HTTP server for the mdocs documentation server.
//!
//! This crate serves a tree of Markdown files over HTTP using axum:
//! - HTML pages under the configured URL prefix
//! - JSON API endpoints for rendered pages and the document listing
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use mdocs_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         source_dir: PathBuf::from("docs"),
//!         version: "1.0.0".to_owned(),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (mdocs-server)
//!                        │
//!                        ├─► {prefix}/{*path}   HTML page
//!                        ├─► /api/pages/{*path} JSON page
//!                        └─► /api/documents     JSON listing
//!                                │
//!                                └─► spawn_blocking ──► Site (resolve + render)
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use mdocs_site::{Site, SiteConfig};
use mdocs_storage::{FsStorage, ResolverConfig};
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Documentation source directory.
    pub source_dir: PathBuf,
    /// URL prefix pages are served under (`""` serves from the root).
    pub url_prefix: String,
    /// Document path served for an empty request.
    pub default_path: String,
    /// File looked up when a request names a directory.
    pub default_filename: String,
    /// Markdown file extension, without the dot.
    pub extension: String,
    /// Strip the first H1 when front-matter provides a title.
    pub strip_title_heading: bool,
    /// Site title shown in HTML pages.
    pub site_title: String,
    /// Per-request render timeout (`None` disables it).
    pub request_timeout: Option<Duration>,
    /// Application version (for cache invalidation).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let resolver = ResolverConfig::default();
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
            source_dir: PathBuf::from("docs"),
            url_prefix: "/docs".to_owned(),
            default_path: resolver.default_path,
            default_filename: resolver.default_filename,
            extension: resolver.extension,
            strip_title_heading: true,
            site_title: "Documentation".to_owned(),
            request_timeout: Some(Duration::from_secs(10)),
            version: String::new(),
        }
    }
}

impl ServerConfig {
    fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            default_path: self.default_path.clone(),
            default_filename: self.default_filename.clone(),
            extension: self.extension.clone(),
        }
    }

    fn site_config(&self) -> SiteConfig {
        SiteConfig {
            url_prefix: self.url_prefix.clone(),
            strip_title_heading: self.strip_title_heading,
        }
    }
}

/// Run the server.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if the address is invalid or the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let storage = Arc::new(FsStorage::with_config(
        config.source_dir.clone(),
        config.resolver_config(),
    ));
    let site = Arc::new(Site::new(storage, config.site_config()));

    let state = Arc::new(AppState {
        site,
        site_title: config.site_title.clone(),
        request_timeout: config.request_timeout,
        version: config.version.clone(),
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(
        address = %addr,
        source_dir = %config.source_dir.display(),
        prefix = %config.url_prefix,
        "Starting server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from mdocs config.
///
/// # Arguments
///
/// * `config` - Loaded `mdocs.toml` configuration
/// * `version` - Application version
#[must_use]
pub fn server_config_from_config(config: &mdocs_config::Config, version: String) -> ServerConfig {
    let docs = &config.docs_resolved;
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        source_dir: docs.source_dir.clone(),
        url_prefix: docs.url_prefix.clone(),
        default_path: docs.default_path.clone(),
        default_filename: docs.default_filename.clone(),
        extension: docs.extension.clone(),
        strip_title_heading: docs.strip_title_heading,
        site_title: docs.site_title.clone(),
        request_timeout: config.server.request_timeout(),
        version,
    }
}
