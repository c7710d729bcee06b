use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

pub mod defaults;

use defaults::*;
use crate::errors::{AppError, AppResult};
use crate::utils::UrlUtils;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub logos: LogoConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Where the playlist and the optional reference table come from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_streams_url")]
    pub streams_url: String,
    /// Local copy of the playlist; reused instead of downloading when present
    #[serde(default = "default_streams_cache")]
    pub streams_cache: PathBuf,
    /// Reference metadata CSV. Setting it switches the build to two-source mode.
    #[serde(default)]
    pub reference_url: Option<String>,
    #[serde(default = "default_reference_cache")]
    pub reference_cache: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Jurisdiction code stamped on every channel in single-source mode
    #[serde(default = "default_country")]
    pub country: String,
    /// User agent attached to entries without an override directive
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Broadcaster name prefixes surfaced first, compared case-insensitively
    #[serde(default = "default_priority_prefixes")]
    pub priority_prefixes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoConfig {
    #[serde(default = "default_logos_enabled")]
    pub enabled: bool,
    #[serde(default = "default_logo_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_channels_path")]
    pub channels_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_streams_url() -> String { DEFAULT_STREAMS_URL.to_string() }
fn default_streams_cache() -> PathBuf { PathBuf::from(DEFAULT_STREAMS_CACHE) }
fn default_reference_cache() -> PathBuf { PathBuf::from(DEFAULT_REFERENCE_CACHE) }
fn default_country() -> String { DEFAULT_COUNTRY.to_string() }
fn default_user_agent() -> String { DEFAULT_USER_AGENT.to_string() }
fn default_priority_prefixes() -> Vec<String> {
    DEFAULT_PRIORITY_PREFIXES.iter().map(|p| p.to_string()).collect()
}
fn default_logos_enabled() -> bool { DEFAULT_LOGOS_ENABLED }
fn default_logo_directory() -> PathBuf { PathBuf::from(DEFAULT_LOGO_DIRECTORY) }
fn default_channels_path() -> PathBuf { PathBuf::from(DEFAULT_CHANNELS_PATH) }
fn default_host() -> String { DEFAULT_HOST.to_string() }
fn default_port() -> u16 { DEFAULT_PORT }
fn default_connect_timeout_secs() -> u64 { DEFAULT_CONNECT_TIMEOUT_SECS }

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            streams_url: default_streams_url(),
            streams_cache: default_streams_cache(),
            reference_url: None,
            reference_cache: default_reference_cache(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            country: default_country(),
            user_agent: default_user_agent(),
            priority_prefixes: default_priority_prefixes(),
        }
    }
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            enabled: default_logos_enabled(),
            directory: default_logo_directory(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            channels_path: default_channels_path(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_file =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from_file(&config_file)
    }

    pub fn load_from_file(config_file: &str) -> Result<Self> {
        let config = if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(config_file)?;
            toml::from_str(&contents)?
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
            default_config
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would silently produce a broken catalog
    pub fn validate(&self) -> AppResult<()> {
        if self.sources.streams_url.trim().is_empty() {
            return Err(AppError::configuration("sources.streams_url must not be empty"));
        }
        if !UrlUtils::is_http_url(&self.sources.streams_url) {
            return Err(AppError::configuration("sources.streams_url must be an http(s) URL"));
        }
        if matches!(&self.sources.reference_url, Some(url) if !UrlUtils::is_http_url(url)) {
            return Err(AppError::configuration(
                "sources.reference_url must be omitted or an http(s) URL",
            ));
        }
        if self.catalog.country.trim().is_empty() {
            return Err(AppError::configuration("catalog.country must not be empty"));
        }
        if self.catalog.user_agent.trim().is_empty() {
            return Err(AppError::configuration("catalog.user_agent must not be empty"));
        }
        if self.web.port == 0 {
            return Err(AppError::configuration("web.port must be non-zero"));
        }
        Ok(())
    }
}
