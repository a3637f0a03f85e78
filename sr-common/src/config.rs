//! Configuration loading
//!
//! Bootstrap settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Built-in default (fallback)
//!
//! The TOML file is optional. An explicitly named file must exist; the
//! platform default (`<config dir>/swimresults/athlete.toml`) is only read if
//! present.

use crate::storage::DEFAULT_STORAGE_TIMEOUT;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the TOML config file
pub const ENV_CONFIG: &str = "SR_ATHLETE_CONFIG";
/// Environment variable for the HTTP port
pub const ENV_PORT: &str = "SR_ATHLETE_PORT";
/// Environment variable for the bind address
pub const ENV_BIND_ADDRESS: &str = "SR_ATHLETE_BIND_ADDRESS";
/// Environment variable for the SQLite database file
pub const ENV_DATABASE: &str = "SR_ATHLETE_DATABASE";

const DEFAULT_PORT: u16 = 8086;
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Settings read from the TOML file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// Address the HTTP listener binds to
    #[serde(default)]
    pub bind_address: Option<String>,

    /// Path to SQLite database file
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Deadline applied to every storage call, in seconds
    #[serde(default)]
    pub storage_timeout_secs: Option<u64>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    pub database_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub bind_address: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub storage_timeout: Duration,
    pub log_level: String,
}

impl ServiceConfig {
    /// Resolve configuration from CLI overrides, the process environment and
    /// the TOML file
    pub fn resolve(overrides: &Overrides) -> Result<Self> {
        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());

        let config_file = overrides
            .config_file
            .clone()
            .or_else(|| env(ENV_CONFIG).map(PathBuf::from));

        let toml_config = match config_file {
            Some(path) => load_toml_config(&path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => load_toml_config(&path)?,
                _ => TomlConfig::default(),
            },
        };

        Self::from_sources(overrides, env, toml_config)
    }

    /// Merge the three sources; `env` looks up environment variables
    pub fn from_sources<E>(overrides: &Overrides, env: E, toml_config: TomlConfig) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let port = match overrides.port {
            Some(port) => port,
            None => match env(ENV_PORT) {
                Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                    Error::Config(format!("{} is not a valid port ('{}'): {}", ENV_PORT, raw, e))
                })?,
                None => toml_config.port.unwrap_or(DEFAULT_PORT),
            },
        };

        let bind_address = overrides
            .bind_address
            .clone()
            .or_else(|| env(ENV_BIND_ADDRESS))
            .or(toml_config.bind_address)
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let database_path = overrides
            .database_path
            .clone()
            .or_else(|| env(ENV_DATABASE).map(PathBuf::from))
            .or(toml_config.database_path)
            .unwrap_or_else(default_database_path);

        let storage_timeout = match toml_config.storage_timeout_secs {
            Some(0) => {
                return Err(Error::Config(
                    "storage_timeout_secs must be greater than zero".to_string(),
                ))
            }
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_STORAGE_TIMEOUT,
        };

        let log_level = overrides
            .log_level
            .clone()
            .unwrap_or(toml_config.logging.level);

        Ok(Self {
            bind_address,
            port,
            database_path,
            storage_timeout,
            log_level,
        })
    }

    /// `host:port` string for the TCP listener
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Platform default location of the TOML config file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("swimresults").join("athlete.toml"))
}

/// Platform default location of the SQLite database
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("swimresults").join("athlete.db"))
        .unwrap_or_else(|| PathBuf::from("./swimresults_data/athlete.db"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config =
            ServiceConfig::from_sources(&Overrides::default(), env_from(&[]), TomlConfig::default())
                .unwrap();

        assert_eq!(config.port, 8086);
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.storage_timeout, Duration::from_secs(10));
        assert_eq!(config.log_level, "info");
        assert!(config.database_path.ends_with("athlete.db"));
    }

    #[test]
    fn test_cli_beats_env_beats_toml() {
        let toml_config = TomlConfig {
            port: Some(9000),
            database_path: Some(PathBuf::from("/toml/athlete.db")),
            ..TomlConfig::default()
        };
        let env = env_from(&[(ENV_PORT, "9100"), (ENV_DATABASE, "/env/athlete.db")]);
        let overrides = Overrides {
            port: Some(9200),
            ..Overrides::default()
        };

        let config = ServiceConfig::from_sources(&overrides, env, toml_config).unwrap();

        assert_eq!(config.port, 9200);
        assert_eq!(config.database_path, PathBuf::from("/env/athlete.db"));
    }

    #[test]
    fn test_invalid_env_port_is_config_error() {
        let result = ServiceConfig::from_sources(
            &Overrides::default(),
            env_from(&[(ENV_PORT, "eighty")]),
            TomlConfig::default(),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let toml_config = TomlConfig {
            storage_timeout_secs: Some(0),
            ..TomlConfig::default()
        };
        let result = ServiceConfig::from_sources(&Overrides::default(), env_from(&[]), toml_config);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_listen_address() {
        let config = ServiceConfig {
            bind_address: "127.0.0.1".to_string(),
            port: 8086,
            database_path: PathBuf::from("athlete.db"),
            storage_timeout: Duration::from_secs(10),
            log_level: "info".to_string(),
        };
        assert_eq!(config.listen_address(), "127.0.0.1:8086");
    }
}
