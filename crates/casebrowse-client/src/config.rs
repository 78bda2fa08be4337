//! Client configuration.
//!
//! The API endpoint is an explicit value handed to [`HttpCaseSource`], never a
//! process-wide constant. Configuration can be loaded from:
//! - a TOML file (path taken from `CASEBROWSE_CONFIG`)
//! - environment variables (`CASEBROWSE_*`)
//!
//! # Example
//!
//! ```rust,no_run
//! use casebrowse_client::config::ClientConfig;
//!
//! // File named by CASEBROWSE_CONFIG if set, else env vars
//! let config = ClientConfig::load().expect("Failed to load config");
//!
//! // Or explicitly from a file
//! let config = ClientConfig::from_file(std::path::Path::new("casebrowse.toml")).expect("Failed to load");
//! ```
//!
//! [`HttpCaseSource`]: crate::HttpCaseSource

use std::env;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use casebrowse_core::defaults::{API_BASE_URL, REQUEST_TIMEOUT_SECS};

/// Environment variable naming a TOML config file.
pub const CONFIG_PATH_VAR: &str = "CASEBROWSE_CONFIG";

static ENV_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<ConfigError> for casebrowse_core::Error {
    fn from(e: ConfigError) -> Self {
        casebrowse_core::Error::Config(e.to_string())
    }
}

/// HTTP data source configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the case API.
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "ClientConfig::default_timeout")]
    pub timeout_seconds: u64,
    /// User-Agent header value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: API_BASE_URL.to_string(),
            timeout_seconds: REQUEST_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    fn default_timeout() -> u64 {
        REQUEST_TIMEOUT_SECS
    }

    /// Config pointing at `base_url` with default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the request timeout.
    pub fn with_timeout_seconds(mut self, secs: u64) -> Self {
        self.timeout_seconds = secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Load from the file named by `CASEBROWSE_CONFIG`, falling back to
    /// environment variables.
    pub fn load() -> ConfigResult<Self> {
        match env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from) {
            Some(path) => {
                info!("Loading client config from: {}", path.display());
                Self::from_file(&path)
            }
            None => {
                debug!("{} not set, using environment variables", CONFIG_PATH_VAR);
                let config = Self::from_env();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `CASEBROWSE_API_URL` | `http://127.0.0.1:8000` | API base URL |
    /// | `CASEBROWSE_TIMEOUT_SECS` | `15` | Per-request timeout |
    /// | `CASEBROWSE_USER_AGENT` | (none) | User-Agent header |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            base_url: lookup("CASEBROWSE_API_URL").unwrap_or_else(|| API_BASE_URL.to_string()),
            timeout_seconds: lookup("CASEBROWSE_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(REQUEST_TIMEOUT_SECS),
            user_agent: lookup("CASEBROWSE_USER_AGENT"),
        }
    }

    /// Load configuration from a TOML file with a `[client]` table.
    ///
    /// `${VAR}` placeholders are replaced from the environment first.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn from_toml_str(content: &str) -> ConfigResult<Self> {
        #[derive(Deserialize)]
        struct TomlRoot {
            client: ClientConfig,
        }

        let content = Self::substitute_env_vars(content);
        let root: TomlRoot = toml::from_str(&content)?;
        root.client.validate()?;
        Ok(root.client)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.base_url.is_empty() {
            return Err(ConfigError::Validation(
                "base_url cannot be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "timeout_seconds must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Replace `${NAME}` placeholders with the variable's value. Unset
    /// variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }
}
