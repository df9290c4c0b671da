use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// First page of the upstream record listing
pub const DEFAULT_FIRST_PAGE_URL: &str = "https://gist.githubusercontent.com/seanders/df38a92ffc4e8c56962e51b6e96e188f/raw/b032669142b7b57ede3496dffee5b7c16b8071e1/page1.json";
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn default_first_page_url() -> String {
    DEFAULT_FIRST_PAGE_URL.to_string()
}

fn default_search_debounce_ms() -> u64 {
    DEFAULT_SEARCH_DEBOUNCE_MS
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

/// YAML config file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Cursor of the first page to load
    #[serde(default = "default_first_page_url")]
    pub first_page_url: String,
    /// Base URL used to resolve relative `nextPage` cursors
    #[serde(default)]
    pub base_url: Option<String>,
    /// Quiet period before a typed search is applied
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            first_page_url: default_first_page_url(),
            base_url: None,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load from a YAML file when one is given, otherwise from the environment
    /// (a `.env` file in the working directory is picked up if present).
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                info!("Loading config from {}", path.display());
                Self::from_yaml_file(path)
            }
            None => {
                if dotenvy::dotenv().is_ok() {
                    info!("Loaded .env");
                }
                Self::from_env()
            }
        }
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Build from `RECORDS_*` variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let var = |key: &str| std::env::var(key).ok().filter(|s| !s.is_empty());
        let parse_u64 = |key: &str, default: u64| -> Result<u64, ConfigError> {
            match var(key) {
                Some(v) => v.parse().map_err(|_| {
                    ConfigError::Config(format!("{} must be a number, got {:?}", key, v))
                }),
                None => Ok(default),
            }
        };

        let config = Self {
            first_page_url: var("RECORDS_FIRST_PAGE_URL").unwrap_or_else(default_first_page_url),
            base_url: var("RECORDS_BASE_URL"),
            search_debounce_ms: parse_u64(
                "RECORDS_SEARCH_DEBOUNCE_MS",
                DEFAULT_SEARCH_DEBOUNCE_MS,
            )?,
            request_timeout_secs: parse_u64(
                "RECORDS_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.first_page_url.trim().is_empty() {
            return Err(ConfigError::Config("first_page_url is empty".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn save_to_yaml(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Default config file location relative to a directory
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join("records.yaml")
    }
}
