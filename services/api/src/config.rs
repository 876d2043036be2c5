//! Process configuration
//!
//! Gathers the server, storage and signing-key settings into one explicit
//! value that is handed to the constructors in [`crate::state`].

use anyhow::{Context, Result};
use auth::jwt::JwtConfig;
use common::{config::ServerConfig, database::DatabaseConfig};
use std::str::FromStr;

/// Where users and invoices are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// PostgreSQL through the shared pool
    #[default]
    Postgres,
    /// Process memory; contents are lost on restart
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => anyhow::bail!("Unknown storage backend '{}'", other),
        }
    }
}

/// Complete configuration for the invoice API process
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub storage: StorageBackend,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

impl ApiConfig {
    /// Create a new ApiConfig from environment variables
    ///
    /// # Environment Variables
    /// - `STORAGE_BACKEND`: `postgres` (default) or `memory`
    /// - plus those read by [`ServerConfig`], [`DatabaseConfig`] and [`JwtConfig`]
    pub fn from_env() -> Result<Self> {
        let storage = match std::env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::default(),
        };

        Ok(Self {
            server: ServerConfig::from_env()?,
            storage,
            database: DatabaseConfig::from_env().context("Invalid database configuration")?,
            jwt: JwtConfig::from_env()?,
        })
    }
}
