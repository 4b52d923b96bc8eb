//! Configuration loader and validator for the catalog importer.
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Environment variable that overrides `catalog.api_key` when set.
pub const API_KEY_ENV: &str = "RIKI_INTERNAL_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub app: App,
    pub catalog: Catalog,
    pub sources: Sources,
}

/// App-level settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct App {
    pub max_batch_size: usize,
    pub request_timeout_secs: u64,
    pub listen_addr: String,
    pub schedule_interval_secs: u64,
}

/// Internal catalog service settings.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Catalog {
    pub base_url: String,
    pub api_key: String,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Remote pages and listings the importer reads from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sources {
    pub set_folder_url: String,
    pub neo_standard_url: String,
    pub card_details_url: String,
    pub user_agent: String,
}

impl App {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn schedule_interval(&self) -> Duration {
        Duration::from_secs(self.schedule_interval_secs)
    }
}

/// Load configuration from a YAML file and validate it.
/// - If `path` is None, uses `config.yaml` in the current working directory.
/// - `RIKI_INTERNAL_API_KEY` replaces `catalog.api_key` when present.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let mut cfg: Config = serde_yaml::from_str(&content)?;
    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if !key.trim().is_empty() {
            cfg.catalog.api_key = key;
        }
    }
    validate(&cfg)?;
    Ok(cfg)
}

fn is_http_url(raw: &str) -> bool {
    matches!(Url::parse(raw), Ok(url) if url.scheme() == "http" || url.scheme() == "https")
}

/// Validate a configuration instance.
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.app.max_batch_size == 0 {
        return Err(ConfigError::Invalid("app.max_batch_size must be > 0"));
    }
    if cfg.app.request_timeout_secs == 0 {
        return Err(ConfigError::Invalid("app.request_timeout_secs must be > 0"));
    }
    if cfg.app.schedule_interval_secs == 0 {
        return Err(ConfigError::Invalid("app.schedule_interval_secs must be > 0"));
    }
    if cfg.app.listen_addr.parse::<std::net::SocketAddr>().is_err() {
        return Err(ConfigError::Invalid("app.listen_addr must be a socket address"));
    }

    if !is_http_url(&cfg.catalog.base_url) {
        return Err(ConfigError::Invalid("catalog.base_url must be an http(s) URL"));
    }
    if cfg.catalog.api_key.trim().is_empty() {
        return Err(ConfigError::Invalid("catalog.api_key must be non-empty"));
    }

    if !is_http_url(&cfg.sources.set_folder_url) {
        return Err(ConfigError::Invalid("sources.set_folder_url must be an http(s) URL"));
    }
    if !is_http_url(&cfg.sources.neo_standard_url) {
        return Err(ConfigError::Invalid("sources.neo_standard_url must be an http(s) URL"));
    }
    if !is_http_url(&cfg.sources.card_details_url) {
        return Err(ConfigError::Invalid("sources.card_details_url must be an http(s) URL"));
    }
    if cfg.sources.user_agent.trim().is_empty() {
        return Err(ConfigError::Invalid("sources.user_agent must be non-empty"));
    }

    Ok(())
}

/// Returns a complete example configuration.
pub fn example() -> &'static str {
    r#"app:
  max_batch_size: 5
  request_timeout_secs: 20
  listen_addr: "127.0.0.1:8787"
  schedule_interval_secs: 86400

catalog:
  base_url: "https://riki.example.com/api"
  api_key: "YOUR_RIKI_INTERNAL_API_KEY"

sources:
  set_folder_url: "https://api.github.com/repos/CCondeluci/WeissSchwarz-ENG-DB/contents/DB"
  neo_standard_url: "https://en.ws-tcg.com/rules/deck/"
  card_details_url: "https://en.ws-tcg.com/cardlist/list/"
  user_agent: "Import-Riki"
"#
}
