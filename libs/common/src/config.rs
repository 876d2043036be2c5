//! HTTP server configuration
//!
//! Loaded with the `config` crate from built-in defaults overlaid with
//! `SERVER_*` environment variables.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

/// Configuration for the HTTP listener
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Per-request timeout in seconds
    pub request_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            request_timeout: 10,
        }
    }
}

impl ServerConfig {
    /// Create a new ServerConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SERVER_HOST`: Bind address (default: "0.0.0.0")
    /// - `SERVER_PORT`: Listen port (default: 5000)
    /// - `SERVER_REQUEST_TIMEOUT`: Request timeout in seconds (default: 10)
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("request_timeout", defaults.request_timeout as i64)?
            .add_source(config::Environment::with_prefix("SERVER").try_parsing(true))
            .build()
            .context("Failed to load server configuration")?
            .try_deserialize()
            .context("Invalid server configuration")
    }

    /// Socket address to bind the listener to
    pub fn bind_address(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.host, self.port))
    }

    /// Request timeout as a duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        unsafe {
            std::env::remove_var("SERVER_HOST");
            std::env::remove_var("SERVER_PORT");
            std::env::remove_var("SERVER_REQUEST_TIMEOUT");
        }
    }

    #[test]
    #[serial]
    fn test_server_config_defaults() {
        clear_env();

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_address().unwrap().port(), 5000);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    #[serial]
    fn test_server_config_from_env() {
        clear_env();
        unsafe {
            std::env::set_var("SERVER_HOST", "127.0.0.1");
            std::env::set_var("SERVER_PORT", "8080");
            std::env::set_var("SERVER_REQUEST_TIMEOUT", "3");
        }

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.request_timeout, 3);
        assert_eq!(
            config.bind_address().unwrap(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap()
        );

        clear_env();
    }

    #[test]
    #[serial]
    fn test_server_config_rejects_bad_port() {
        clear_env();
        unsafe {
            std::env::set_var("SERVER_PORT", "not-a-port");
        }

        assert!(ServerConfig::from_env().is_err());

        clear_env();
    }
}
