//! Configuration management for mdocs.
//!
//! Parses `mdocs.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `docs.url_prefix`
//! - `docs.site_title`

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override the URL prefix documents are served under.
    pub url_prefix: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdocs.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Documentation configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Per-request rendering timeout in seconds (0 disables it).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Request timeout, `None` when disabled.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
            request_timeout_secs: 10,
        }
    }
}

/// Raw docs configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    url_prefix: Option<String>,
    default_path: Option<String>,
    default_filename: Option<String>,
    extension: Option<String>,
    strip_title_heading: Option<bool>,
    site_title: Option<String>,
}

/// Resolved documentation configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsConfig {
    /// Root directory of the Markdown tree.
    pub source_dir: PathBuf,
    /// Site-rooted URL prefix for documents (e.g. `/docs`, empty for root).
    pub url_prefix: String,
    /// Document served for an empty request path.
    pub default_path: String,
    /// File (without extension) served for a directory request.
    pub default_filename: String,
    /// Markdown extension without the leading dot.
    pub extension: String,
    /// Drop the first `<h1>` when front-matter provides a title.
    pub strip_title_heading: bool,
    /// Site name shown in page shells.
    pub site_title: String,
}

impl DocsConfig {
    /// Default docs configuration rooted at `base`.
    #[must_use]
    pub fn with_base(base: &Path) -> Self {
        Self {
            source_dir: base.join("docs"),
            url_prefix: "/docs".to_owned(),
            default_path: "getting-started/README".to_owned(),
            default_filename: "README".to_owned(),
            extension: "md".to_owned(),
            strip_title_heading: true,
            site_title: "Documentation".to_owned(),
        }
    }
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self::with_base(Path::new("."))
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`server.host`").
        field: String,
        /// Error message (e.g., "${`MDOCS_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdocs.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(prefix) = &settings.url_prefix {
            self.docs_resolved.url_prefix = normalize_prefix(prefix);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            docs: DocsConfigRaw::default(),
            docs_resolved: DocsConfig::with_base(base),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_docs()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 lets the OS pick, never what a config file means
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_docs(&self) -> Result<(), ConfigError> {
        let docs = &self.docs_resolved;

        if !docs.url_prefix.is_empty()
            && (!docs.url_prefix.starts_with('/') || docs.url_prefix.ends_with('/'))
        {
            return Err(ConfigError::Validation(
                "docs.url_prefix must start with '/' and not end with '/'".to_owned(),
            ));
        }

        require_non_empty(&docs.default_filename, "docs.default_filename")?;
        require_non_empty(&docs.extension, "docs.extension")?;
        if docs.extension.starts_with('.') {
            return Err(ConfigError::Validation(
                "docs.extension must not start with '.'".to_owned(),
            ));
        }
        if docs.default_path.split('/').any(|s| s == "..") {
            return Err(ConfigError::Validation(
                "docs.default_path cannot contain '..'".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        if let Some(ref prefix) = self.docs.url_prefix {
            self.docs.url_prefix = Some(expand::expand_env(prefix, "docs.url_prefix")?);
        }
        if let Some(ref title) = self.docs.site_title {
            self.docs.site_title = Some(expand::expand_env(title, "docs.site_title")?);
        }

        Ok(())
    }

    /// Resolve raw docs settings against the config directory.
    fn resolve(&mut self, config_dir: &Path) {
        let defaults = DocsConfig::with_base(config_dir);
        let raw = std::mem::take(&mut self.docs);

        self.docs_resolved = DocsConfig {
            source_dir: raw
                .source_dir
                .map_or(defaults.source_dir, |dir| config_dir.join(dir)),
            url_prefix: raw
                .url_prefix
                .as_deref()
                .map_or(defaults.url_prefix, normalize_prefix),
            default_path: raw
                .default_path
                .map_or(defaults.default_path, |p| p.trim_matches('/').to_owned()),
            default_filename: raw.default_filename.unwrap_or(defaults.default_filename),
            extension: raw.extension.unwrap_or(defaults.extension),
            strip_title_heading: raw
                .strip_title_heading
                .unwrap_or(defaults.strip_title_heading),
            site_title: raw.site_title.unwrap_or(defaults.site_title),
        };
    }
}

/// Normalize a URL prefix: `"docs/"` → `"/docs"`, `"/"` → `""`.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
