//! CLI configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. Command-line flags override what is loaded here.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use linecheck_core::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV: &str = "LINECHECK_LOG";

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub max_connections: u32,

    /// Page size used when a history command does not pass one
    pub page_size: u32,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns the value of a
    /// variable if it is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = AppConfig {
            database_path: lookup("LINECHECK_DATABASE_PATH")
                .unwrap_or_else(|| "./linecheck.db".to_string())
                .into(),

            max_connections: lookup("LINECHECK_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("LINECHECK_MAX_CONNECTIONS".to_string()))?,

            page_size: lookup("LINECHECK_PAGE_SIZE")
                .unwrap_or_else(|| DEFAULT_PAGE_SIZE.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("LINECHECK_PAGE_SIZE".to_string()))?,
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue("LINECHECK_MAX_CONNECTIONS".to_string()));
        }
        if config.page_size == 0 || config.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidValue("LINECHECK_PAGE_SIZE".to_string()));
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.database_path, PathBuf::from("./linecheck.db"));
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("LINECHECK_DATABASE_PATH", "/var/lib/linecheck/qa.db"),
            ("LINECHECK_PAGE_SIZE", "50"),
        ])
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/var/lib/linecheck/qa.db"));
        assert_eq!(config.page_size, 50);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            load(&[("LINECHECK_MAX_CONNECTIONS", "many")]),
            Err(ConfigError::InvalidValue(var)) if var == "LINECHECK_MAX_CONNECTIONS"
        ));
        assert!(load(&[("LINECHECK_PAGE_SIZE", "0")]).is_err());
        assert!(load(&[("LINECHECK_PAGE_SIZE", "501")]).is_err());
    }
}
