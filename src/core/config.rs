//! Configuration for the graph API server
//!
//! Settings are read from a TOML file. Every section and field is optional;
//! missing values take their defaults.

use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};

use crate::constants::{DEFAULT_HTTP_PORT, DEFAULT_MAX_BODY_BYTES};
use crate::types::ConfigError;
use crate::{log_info, log_warn};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Graph endpoint configuration
    pub graph: GraphConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP server bind address
    pub http_addr: SocketAddr,
}

/// Graph endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Largest accepted mutation body in bytes
    pub max_body_bytes: usize,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_HTTP_PORT)),
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

impl Config {
    /// Override the bind address from a CLI value
    pub fn with_http_addr(mut self, addr: &str) -> Result<Self, ConfigError> {
        self.server.http_addr = addr
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("http address '{}'", addr)))?;
        Ok(self)
    }

    /// Override the log level from a CLI value
    pub fn with_log_level(mut self, level: &str) -> Self {
        self.logging.level = level.to_string();
        self
    }
}

/// Load configuration from file
pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;
    let config: Config = toml::from_str(&config_str).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })?;
    Ok(config)
}

/// Where the active configuration came from
#[derive(Debug)]
pub enum ConfigSource {
    /// Loaded from this file
    File(String),
    /// No file given
    Defaults,
    /// The file could not be used; defaults took its place
    Fallback {
        /// File that failed to load
        path: String,
        /// Why it failed
        error: ConfigError,
    },
}

impl ConfigSource {
    /// Log the configuration source. Call once logging is initialized.
    pub fn report(&self) {
        match self {
            ConfigSource::File(path) => log_info!("Loaded configuration from: {}", path),
            ConfigSource::Defaults => log_info!("No config file specified, using defaults"),
            ConfigSource::Fallback { path, error } => {
                log_warn!("Failed to load config from {}: {}. Using defaults.", path, error)
            }
        }
    }
}

/// Load configuration from file or use defaults.
///
/// Nothing is logged here; pass the returned source to
/// `ConfigSource::report` once logging is up.
pub fn load_config_or_default(path: Option<&str>) -> (Config, ConfigSource) {
    match path {
        Some(path) => match load_config(path) {
            Ok(config) => (config, ConfigSource::File(path.to_string())),
            Err(error) => (
                Config::default(),
                ConfigSource::Fallback { path: path.to_string(), error },
            ),
        },
        None => (Config::default(), ConfigSource::Defaults),
    }
}
