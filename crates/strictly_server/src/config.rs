//! Server configuration.

use crate::session::DEFAULT_MAX_SPECTATORS;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use strictly_checkers::RulesConfig;
use tracing::{debug, info, instrument};

/// Configuration for the synchronization server.
///
/// Every field has a default, so an empty TOML file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    port: u16,

    /// Rules applied to new sessions.
    #[serde(default)]
    rules: RulesConfig,

    /// Per-session broadcast buffer; slower subscribers are told they lagged.
    #[serde(default = "default_event_buffer")]
    event_buffer: usize,

    /// Spectators allowed per session.
    #[serde(default = "default_max_spectators")]
    max_spectators: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4000
}

fn default_event_buffer() -> usize {
    64
}

fn default_max_spectators() -> usize {
    DEFAULT_MAX_SPECTATORS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            rules: RulesConfig::default(),
            event_buffer: default_event_buffer(),
            max_spectators: default_max_spectators(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Applies the `PORT` environment variable, if set.
    #[instrument(skip(self))]
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        match std::env::var("PORT") {
            Ok(port) => self.with_port_str(&port),
            Err(_) => Ok(self),
        }
    }

    fn with_port_str(mut self, port: &str) -> Result<Self, ConfigError> {
        self.port = port
            .trim()
            .parse()
            .map_err(|e| ConfigError::new(format!("Invalid PORT {:?}: {}", port, e)))?;
        debug!(port = self.port, "Port overridden from environment");
        Ok(self)
    }

    /// Replaces the bind host.
    pub fn with_host(mut self, host: String) -> Self {
        self.host = host;
        self
    }

    /// Replaces the bind port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Replaces the per-session broadcast buffer.
    pub fn with_event_buffer(mut self, event_buffer: usize) -> Self {
        self.event_buffer = event_buffer;
        self
    }

    /// Replaces the rules for new sessions.
    pub fn with_rules(mut self, rules: RulesConfig) -> Self {
        self.rules = rules;
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error with caller location.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
