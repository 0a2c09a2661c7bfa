//! HTTP server configuration.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Server configuration loaded from environment variables.
///
/// Environment variables are prefixed with `SERVER_`:
/// - `SERVER_PORT`: Listener port (required)
/// - `SERVER_API_KEY`: Shared secret expected in the `apikey` header (required)
/// - `SERVER_HOST`: Bind address (default: "0.0.0.0")
/// - `SERVER_LOG_DIR`: Directory for per-process log files (default: "logs")
/// - `SERVER_REQUIRE_API_KEY`: Enforce the API key on every route (default: false)
/// - `SERVER_HEALTH_CHECK_INTERVAL_SECS`: Uptime tick length (default: 60)
/// - `SERVER_HEALTH_CHECK_EVERY`: Ticks between self pings (default: 5)
/// - `SERVER_HEALTH_CHECK_URL`: Ping target (default: `http://127.0.0.1:<port>/ping`)
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listener port
    pub port: u16,

    /// API key
    pub api_key: String,

    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Log directory
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Mount the API-key middleware
    #[serde(default)]
    pub require_api_key: bool,

    /// Seconds per uptime tick
    #[serde(default = "default_health_check_interval")]
    pub health_check_interval_secs: u64,

    /// Number of ticks between self pings
    #[serde(default = "default_health_check_every")]
    pub health_check_every: u64,

    /// Override for the self ping URL
    #[serde(default)]
    pub health_check_url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_health_check_interval() -> u64 {
    60
}

fn default_health_check_every() -> u64 {
    5
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are prefixed with `SERVER_`.
    pub fn from_env() -> AppResult<Self> {
        let config = envy::prefixed("SERVER_").from_env::<ServerConfig>()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot be served with.
    pub fn validate(&self) -> AppResult<()> {
        if self.port == 0 {
            return Err(AppError::Config("The Server Port is not defined.".to_string()));
        }
        if self.api_key.trim().is_empty() {
            return Err(AppError::Config("The Server API Key is not defined.".to_string()));
        }
        if self.health_check_every == 0 || self.health_check_interval_secs == 0 {
            return Err(AppError::Config(
                "Health check interval and frequency must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the server bind address as a string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Length of one uptime tick.
    pub fn health_check_interval(&self) -> Duration {
        Duration::from_secs(self.health_check_interval_secs)
    }

    /// URL the supervisor pings to confirm the listener is alive.
    pub fn ping_url(&self) -> String {
        self.health_check_url
            .clone()
            .unwrap_or_else(|| format!("http://127.0.0.1:{}/ping", self.port))
    }
}
