//! CLI command implementations.

pub(crate) mod list;
pub(crate) mod render;
pub(crate) mod serve;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use mdocs_config::{CliSettings, Config};
use mdocs_site::{Site, SiteConfig};
use mdocs_storage::{FsStorage, ResolverConfig};

pub(crate) use list::ListArgs;
pub(crate) use render::RenderArgs;
pub(crate) use serve::ServeArgs;

use crate::error::CliError;

/// Options shared by every command that reads the documentation tree.
#[derive(Args)]
pub(crate) struct SiteArgs {
    /// Path to configuration file (default: auto-discover mdocs.toml).
    #[arg(short, long, env = "MDOCS_CONFIG")]
    config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// URL prefix documents are served under (overrides config).
    #[arg(long)]
    prefix: Option<String>,
}

impl SiteArgs {
    /// Load configuration with these options and any extra CLI settings applied.
    pub(crate) fn load_config(self, settings: CliSettings) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            url_prefix: self.prefix,
            ..settings
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Build a filesystem-backed [`Site`] from configuration.
pub(crate) fn open_site(config: &Config) -> Site {
    let docs = &config.docs_resolved;
    let storage = FsStorage::with_config(
        docs.source_dir.clone(),
        ResolverConfig {
            default_path: docs.default_path.clone(),
            default_filename: docs.default_filename.clone(),
            extension: docs.extension.clone(),
        },
    );
    let site_config = SiteConfig {
        url_prefix: docs.url_prefix.clone(),
        strip_title_heading: docs.strip_title_heading,
    };
    Site::new(Arc::new(storage), site_config)
}
