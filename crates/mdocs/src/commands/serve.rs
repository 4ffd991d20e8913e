//! `mdocs serve` command implementation.

use clap::Args;
use mdocs_config::CliSettings;
use mdocs_server::{run_server, server_config_from_config};

use crate::commands::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    #[command(flatten)]
    site: SiteArgs,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.site.load_config(CliSettings {
            host: self.host,
            port: self.port,
            ..CliSettings::default()
        })?;

        let docs = &config.docs_resolved;
        output.banner(version);
        output.setting(
            "Listening",
            format!(
                "http://{}:{}{}",
                config.server.host, config.server.port, docs.url_prefix
            ),
        );
        output.setting("Source", docs.source_dir.display());
        if let Some(path) = &config.config_path {
            output.setting("Config", path.display());
        }
        match config.server.request_timeout() {
            Some(timeout) => output.setting("Timeout", format!("{}s", timeout.as_secs())),
            None => output.setting("Timeout", "disabled"),
        }

        if !docs.source_dir.is_dir() {
            tracing::warn!(
                path = %docs.source_dir.display(),
                "Source directory does not exist, every page will be 404"
            );
        }

        let server_config = server_config_from_config(&config, version.to_owned());
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
