//! Server configuration module.
//!
//! Handles loading configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use std::net::SocketAddr;

/// Server configuration.
///
/// Configuration values can be set via environment variables (or a `.env` file):
/// - `SQLMACRO_HOST`: The host address to bind to (default: "0.0.0.0")
/// - `SQLMACRO_PORT`: The port to listen on (default: 8080)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The host address to bind to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
}

impl Config {
    /// Creates a new configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `SQLMACRO_PORT` is set but cannot be parsed as a valid port number.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("SQLMACRO_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = lookup("SQLMACRO_PORT")
            .map(|p| {
                p.parse::<u16>()
                    .with_context(|| format!("SQLMACRO_PORT must be a port number, got '{p}'"))
            })
            .transpose()?
            .unwrap_or(8080);

        Ok(Self { host, port })
    }

    /// Returns the socket address for binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the host and port combination is not a valid socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid socket address {}:{}", self.host, self.port))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}
