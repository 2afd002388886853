//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SELLER_API_URL` - Marketplace API base URL (default: `http://localhost:3001`)
//! - `SELLER_STATE_DIR` - Directory for the persisted session file
//!   (default: `<local data dir>/seller-console`)
//! - `SELLER_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `SELLER_DASHBOARD_CACHE_TTL_SECS` - Dashboard cache lifetime (default: 300)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:3001";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DASHBOARD_TTL_SECS: u64 = 300;
const STATE_DIR_NAME: &str = "seller-console";
const SESSION_FILE_NAME: &str = "session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("No state directory: set SELLER_STATE_DIR")]
    NoStateDir,
}

/// Seller Console client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every API path is joined onto
    pub api_url: Url,
    /// Directory holding the persisted session file
    pub state_dir: PathBuf,
    /// Timeout applied to every HTTP request
    pub http_timeout: Duration,
    /// Lifetime of cached dashboard responses
    pub dashboard_cache_ttl: Duration,
}

impl ClientConfig {
    /// Load configuration from the process environment (and `.env`, if present).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set but cannot be parsed, or no
    /// state directory can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("SELLER_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let api_url = Url::parse(&api_url)
            .map_err(|e| ConfigError::InvalidEnvVar("SELLER_API_URL".to_owned(), e.to_string()))?;

        let state_dir = match lookup("SELLER_STATE_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_local_dir()
                .ok_or(ConfigError::NoStateDir)?
                .join(STATE_DIR_NAME),
        };

        let http_timeout = Duration::from_secs(parse_secs(
            &lookup,
            "SELLER_HTTP_TIMEOUT_SECS",
            DEFAULT_TIMEOUT_SECS,
        )?);
        let dashboard_cache_ttl = Duration::from_secs(parse_secs(
            &lookup,
            "SELLER_DASHBOARD_CACHE_TTL_SECS",
            DEFAULT_DASHBOARD_TTL_SECS,
        )?);

        Ok(Self {
            api_url,
            state_dir,
            http_timeout,
            dashboard_cache_ttl,
        })
    }

    /// Defaults pointed at `api_url`, keeping state in `state_dir`.
    #[must_use]
    pub const fn new(api_url: Url, state_dir: PathBuf) -> Self {
        Self {
            api_url,
            state_dir,
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            dashboard_cache_ttl: Duration::from_secs(DEFAULT_DASHBOARD_TTL_SECS),
        }
    }

    /// Path of the persisted session file.
    #[must_use]
    pub fn session_file(&self) -> PathBuf {
        self.state_dir.join(SESSION_FILE_NAME)
    }
}

fn parse_secs<F>(lookup: &F, key: &str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidEnvVar(
            key.to_owned(),
            "must be greater than zero".to_owned(),
        )),
        Ok(secs) => Ok(secs),
        Err(e) => Err(ConfigError::InvalidEnvVar(key.to_owned(), e.to_string())),
    }
}
