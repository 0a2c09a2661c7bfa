//! Database configuration for the PostgreSQL connection.

use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

use crate::error::{AppError, AppResult};

/// Database configuration loaded from environment variables.
///
/// Environment variables are prefixed with `DATABASE_`. The first five are
/// mandatory and have no defaults:
/// - `DATABASE_HOST`: Database host
/// - `DATABASE_PORT`: Database port
/// - `DATABASE_NAME`: Database name
/// - `DATABASE_USER`: Database user
/// - `DATABASE_PASSWORD`: Database password
///
/// Optional:
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `DATABASE_ACQUIRE_TIMEOUT`: Seconds to wait for a connection (default: 30)
/// - `DATABASE_AUTO_MIGRATE`: Create missing tables at startup (default: false)
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database host
    pub host: String,

    /// Database port
    pub port: u16,

    /// Database name
    pub name: String,

    /// Database user
    pub user: String,

    /// Database password
    pub password: String,

    /// Maximum connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection acquire timeout in seconds
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout: u64,

    /// Run the embedded schema DDL at startup
    #[serde(default)]
    pub auto_migrate: bool,
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout() -> u64 {
    30
}

impl DatabaseConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are prefixed with `DATABASE_`.
    pub fn from_env() -> AppResult<Self> {
        let config = envy::prefixed("DATABASE_").from_env::<DatabaseConfig>()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject blank mandatory values.
    ///
    /// `envy` already fails on absent variables; this catches variables that
    /// are present but empty.
    pub fn validate(&self) -> AppResult<()> {
        let required = [
            ("DATABASE_HOST", self.host.as_str()),
            ("DATABASE_NAME", self.name.as_str()),
            ("DATABASE_USER", self.user.as_str()),
            ("DATABASE_PASSWORD", self.password.as_str()),
        ];

        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(AppError::Config(format!("{} is not defined", key)));
            }
        }

        if self.port == 0 {
            return Err(AppError::Config("DATABASE_PORT is not defined".to_string()));
        }

        Ok(())
    }

    /// Get PostgreSQL connection options.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }
}
