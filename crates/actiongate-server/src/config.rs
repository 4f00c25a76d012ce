//! Server configuration read from environment variables.
//!
//! - `ACTIONGATE_NAME`: service name used in logs (default: "actiongate")
//! - `ACTIONGATE_PORT`: listen port (default: 3000)
//! - `ACTIONGATE_DEBUG`: include `exceptionStr` diagnostics (default: false)
//!
//! Values are read once at startup; the debug flag is then passed to the
//! dispatcher as an explicit [`DispatchConfig`].

use actiongate_core::{ConfigError, DispatchConfig};

pub const ENV_NAME: &str = "ACTIONGATE_NAME";
pub const ENV_PORT: &str = "ACTIONGATE_PORT";
pub const ENV_DEBUG: &str = "ACTIONGATE_DEBUG";

pub const DEFAULT_NAME: &str = "actiongate";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub name: String,
    pub port: u16,
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            name: DEFAULT_NAME.to_string(),
            port: DEFAULT_PORT,
            debug: false,
        }
    }
}

impl ServerConfig {
    pub fn new(name: impl Into<String>, debug: bool) -> Self {
        ServerConfig {
            name: name.into(),
            debug,
            ..ServerConfig::default()
        }
    }

    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServerConfig::default();
        if let Some(name) = lookup(ENV_NAME).filter(|n| !n.trim().is_empty()) {
            config.name = name;
        }
        if let Some(port) = lookup(ENV_PORT) {
            config.port = port.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    key: ENV_PORT.to_string(),
                    value: port.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        if let Some(debug) = lookup(ENV_DEBUG) {
            config.debug = parse_flag(ENV_DEBUG, &debug)?;
        }
        Ok(config)
    }

    pub fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig { debug: self.debug }
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}
