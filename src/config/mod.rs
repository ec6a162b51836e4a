//! Configuration handling for the application.
//!
//! Everything is read once at startup by `Config::from_env`, with
//! development defaults for anything unset. The database is optional: when
//! `DATABASE_URL` is absent, results are simply never persisted.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use crate::acquirer::Strategy;

/// Environment variable names.
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_PORT: &str = "PORT";
pub const ENV_SCRAPER_PORT: &str = "SCRAPER_PORT";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_STRATEGY: &str = "HARVESTER_STRATEGY";
pub const ENV_CHROME_EXECUTABLE: &str = "CHROME_EXECUTABLE";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3001;

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    bind_addr: String,
    database_url: Option<String>,
    strategy: Strategy,
    chrome_executable: Option<PathBuf>,
}

impl Config {
    /// Create a new config explicitly.
    pub fn new(
        bind_addr: impl Into<String>,
        database_url: Option<String>,
        strategy: Strategy,
        chrome_executable: Option<PathBuf>,
    ) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            database_url,
            strategy,
            chrome_executable,
        }
    }

    /// Load from environment variables, falling back to development defaults.
    ///
    /// `BIND_ADDR` wins over `PORT`, which wins over `SCRAPER_PORT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = match non_empty_var(ENV_BIND_ADDR) {
            Some(addr) => addr,
            None => {
                let port = match non_empty_var(ENV_PORT).or_else(|| non_empty_var(ENV_SCRAPER_PORT))
                {
                    Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                        field: ENV_PORT,
                        reason: e.to_string(),
                    })?,
                    None => DEFAULT_PORT,
                };
                format!("{}:{}", DEFAULT_HOST, port)
            }
        };

        let strategy = match non_empty_var(ENV_STRATEGY) {
            Some(raw) => raw
                .parse::<Strategy>()
                .map_err(|reason| ConfigError::InvalidValue {
                    field: ENV_STRATEGY,
                    reason,
                })?,
            None => Strategy::Static,
        };

        Ok(Self {
            bind_addr,
            database_url: non_empty_var(ENV_DATABASE_URL),
            strategy,
            chrome_executable: non_empty_var(ENV_CHROME_EXECUTABLE).map(PathBuf::from),
        })
    }

    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }
    /// PostgreSQL URL for the result sink, if persistence is enabled.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }
    pub fn chrome_executable(&self) -> Option<&PathBuf> {
        self.chrome_executable.as_ref()
    }
}

/// Development defaults (mirrors `from_env` with no env overrides).
impl Default for Config {
    fn default() -> Self {
        Self::new(
            format!("{}:{}", DEFAULT_HOST, DEFAULT_PORT),
            None,
            Strategy::Static,
            None,
        )
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
