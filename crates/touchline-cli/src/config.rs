//! CLI configuration.
//!
//! Loaded from `$XDG_CONFIG_HOME/touchline/config.toml` when present. Every
//! field is optional.
//!
//! ## Example Configuration
//!
//! ```toml
//! snapshot_dir = "/var/lib/touchline/team_snapshots"
//!
//! [api]
//! base_url = "http://classic-api.blackoutrugby.com"
//! credentials_file = "/etc/touchline/brkeys.json"
//! timeout_seconds = 30
//! max_retries = 3
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;

use touchline_client::{ClientConfig, DEFAULT_BASE_URL};

use crate::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the snapshot files.
    #[serde(default)]
    pub snapshot_dir: Option<PathBuf>,

    #[serde(default)]
    pub api: ApiConfig,
}

/// Blackout Rugby API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// JSON key file with the member and developer credentials.
    #[serde(default)]
    pub credentials_file: Option<PathBuf>,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Retries for transient failures (default: 3)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            credentials_file: None,
            timeout_seconds: default_timeout_seconds(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_timeout_seconds() -> u64 {
    30
}

const fn default_max_retries() -> u32 {
    3
}

impl Config {
    /// Loads the configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used if present, and built-in defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML or
    /// fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => {
                if !path.exists() {
                    bail!("Configuration file not found: {}", path.display());
                }
                path.to_path_buf()
            }
            None => match paths::config_file() {
                Some(path) if path.exists() => path,
                _ => {
                    debug!("No configuration file, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.validate()?;

        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the timeout is zero.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api.base_url)
            .with_context(|| format!("Invalid api.base_url '{}'", self.api.base_url))?;

        if self.api.timeout_seconds == 0 {
            bail!("api.timeout_seconds must be greater than 0");
        }

        Ok(())
    }

    /// The snapshot directory, falling back to the XDG data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no directory is configured and the home directory
    /// cannot be determined.
    pub fn snapshot_dir(&self) -> Result<PathBuf> {
        self.snapshot_dir
            .clone()
            .or_else(paths::snapshot_dir)
            .ok_or_else(|| anyhow!("Failed to determine the snapshot directory"))
    }

    /// The credentials file, falling back to the XDG config directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no file is configured and the home directory cannot
    /// be determined.
    pub fn credentials_file(&self) -> Result<PathBuf> {
        self.api
            .credentials_file
            .clone()
            .or_else(paths::credentials_file)
            .ok_or_else(|| anyhow!("Failed to determine the credentials file location"))
    }

    /// HTTP client settings derived from the `[api]` section.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_base_url(self.api.base_url.clone())
            .with_timeout(Some(Duration::from_secs(self.api.timeout_seconds)))
            .with_max_retries(self.api.max_retries)
    }
}
