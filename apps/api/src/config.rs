//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                    | Default       |
//! |-----------------------------|---------------|
//! | `MATREG_HOST`               | `0.0.0.0`     |
//! | `MATREG_PORT`               | `8069`        |
//! | `MATREG_DATABASE_PATH`      | `./matreg.db` |
//! | `MATREG_DB_MAX_CONNECTIONS` | `5`           |
//! | `MATREG_DEFAULT_PAGE_SIZE`  | `100`         |
//! | `MATREG_MAX_PAGE_SIZE`      | `1000`        |

use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use matreg_core::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind
    pub host: String,

    /// HTTP port
    pub port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub db_max_connections: u32,

    /// `limit` used when a list request does not pass one
    pub default_page_size: u32,

    /// Largest accepted `limit`
    pub max_page_size: u32,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn load_from<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = ApiConfig {
            host: lookup("MATREG_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),

            port: parse_var(&lookup, "MATREG_PORT", 8069)?,

            database_path: lookup("MATREG_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./matreg.db")),

            db_max_connections: parse_var(&lookup, "MATREG_DB_MAX_CONNECTIONS", 5)?,

            default_page_size: parse_var(&lookup, "MATREG_DEFAULT_PAGE_SIZE", DEFAULT_PAGE_SIZE)?,

            max_page_size: parse_var(&lookup, "MATREG_MAX_PAGE_SIZE", MAX_PAGE_SIZE)?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "MATREG_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        // 1 <= default <= max
        if config.default_page_size == 0 || config.default_page_size > config.max_page_size {
            return Err(ConfigError::InvalidValue(
                "MATREG_DEFAULT_PAGE_SIZE".to_string(),
            ));
        }

        Ok(config)
    }

    /// Socket address to listen on.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("MATREG_HOST".to_string()))
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
