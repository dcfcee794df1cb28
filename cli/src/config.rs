//! Configuration for the azd-mcp binary.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Command-line flags override these values.

use azd_mcp_tools::schema::DEFAULT_FETCH_TIMEOUT;
use std::env;
use std::time::Duration;

/// Binary configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Fallback log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Remote schema fetch timeout in seconds
    pub schema_fetch_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            schema_fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT.as_secs(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            log_level: lookup("AZD_MCP_LOG").unwrap_or(defaults.log_level),
            schema_fetch_timeout_secs: lookup("AZD_SCHEMA_FETCH_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.schema_fetch_timeout_secs),
        }
    }

    /// Remote schema fetch timeout
    #[must_use]
    pub const fn schema_fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.schema_fetch_timeout_secs)
    }
}
