//! Runtime settings resolution.
//!
//! Settings come from command-line flags first, then the environment, then
//! the optional `~/.deaddrop/config.toml`, then built-in defaults. Credential
//! tokens are only ever read from the environment.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Fully resolved settings for one invocation.
#[derive(Clone)]
pub struct Settings {
    /// Organization whose directory is consulted.
    pub org: String,
    /// Base URL of the directory API.
    pub api_url: String,
    /// Credential token for the directory service.
    pub github_token: String,
    /// Where snapshot records are cached.
    pub cache_dir: PathBuf,
    /// Freshness window for cached records.
    pub cache_ttl: Duration,
    /// Refetch even when the cache is fresh.
    pub refresh: bool,
    /// Address of the storage service, when configured.
    pub vault_addr: Option<String>,
    /// Credential token for the storage service, when configured.
    pub vault_token: Option<String>,
}

impl Settings {
    /// Resolve settings from flag values, the environment, and the config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` when no organization or directory
    /// token can be found, and `ConfigError::Parse` if the config file is
    /// malformed.
    pub fn resolve(
        org: Option<String>,
        api_url: Option<String>,
        cache_dir: Option<PathBuf>,
        refresh: bool,
    ) -> Result<Self> {
        let file = FileConfig::load()?;

        let org = org
            .or(file.org)
            .ok_or(ConfigError::MissingField { field: "org" })?;
        if org.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "org",
                reason: "must not be empty".to_string(),
            }
            .into());
        }

        let api_url = api_url
            .or(file.api_url)
            .unwrap_or_else(|| constants::DIRECTORY_API.to_string());

        let cache_dir = match cache_dir.or(file.cache_dir) {
            Some(dir) => dir,
            None => home_dir()?.join(constants::CACHE_DIR),
        };

        let github_token = env_value("GITHUB_TOKEN")
            .ok_or(ConfigError::MissingField { field: "github_token" })?;
        let vault_addr = env_value("VAULT_ADDR").or(file.vault_addr);
        let vault_token = env_value("VAULT_TOKEN");

        debug!(org, cache = %cache_dir.display(), refresh, "settings resolved");

        Ok(Self {
            org,
            api_url,
            github_token,
            cache_dir,
            cache_ttl: constants::CACHE_TTL,
            refresh,
            vault_addr,
            vault_token,
        })
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("org", &self.org)
            .field("api_url", &self.api_url)
            .field("github_token", &"<redacted>")
            .field("cache_dir", &self.cache_dir)
            .field("cache_ttl", &self.cache_ttl)
            .field("refresh", &self.refresh)
            .field("vault_addr", &self.vault_addr)
            .field("vault_token", &self.vault_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Optional config file (`~/.deaddrop/config.toml`).
///
/// ```toml
/// org = "my-org"
/// api_url = "https://github.example.com/api/v3"
/// vault_addr = "https://vault.example.com"
/// ```
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    org: Option<String>,
    api_url: Option<String>,
    cache_dir: Option<PathBuf>,
    vault_addr: Option<String>,
}

impl FileConfig {
    fn load() -> Result<Self> {
        let path = match dirs::home_dir() {
            Some(home) => home.join(constants::CONFIG_DIR).join(constants::CONFIG_FILE),
            None => return Ok(Self::default()),
        };
        if !path.exists() {
            return Ok(Self::default());
        }

        debug!(path = %path.display(), "loading config file");
        let contents = std::fs::read_to_string(&path).map_err(ConfigError::ReadFile)?;
        Self::parse(&contents)
    }

    fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents).map_err(ConfigError::Parse)?)
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| ConfigError::NoHomeDir.into())
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
