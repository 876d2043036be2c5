//! Application state shared across handlers

use std::sync::Arc;

use anyhow::Result;
use auth::{
    CredentialService, SharedCredentials,
    jwt::JwtService,
    password::PasswordHasher,
    repositories::{InMemoryUserRepository, PgUserRepository, UserRepository},
};
use common::{database::init_pool, error::DatabaseError};
use tracing::{info, warn};

use crate::{
    config::{ApiConfig, StorageBackend},
    repositories::{InMemoryInvoiceRepository, InvoiceRepository, PgInvoiceRepository},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub credentials: SharedCredentials,
    pub invoices: Arc<dyn InvoiceRepository>,
}

impl AppState {
    /// Assemble state from already-constructed components
    pub fn new(credentials: SharedCredentials, invoices: Arc<dyn InvoiceRepository>) -> Self {
        Self {
            credentials,
            invoices,
        }
    }

    /// Whether every backing store answers
    pub async fn is_healthy(&self) -> bool {
        self.credentials.health_check().await && self.invoices.health_check().await
    }
}

/// Build the state for the configured storage backend
///
/// For PostgreSQL this connects the pool and runs pending migrations.
pub async fn build_state(config: &ApiConfig) -> Result<AppState> {
    let jwt_service = JwtService::new(config.jwt.clone())?;

    let (users, invoices): (Arc<dyn UserRepository>, Arc<dyn InvoiceRepository>) =
        match config.storage {
            StorageBackend::Postgres => {
                let pool = init_pool(&config.database).await?;

                sqlx::migrate!()
                    .run(&pool)
                    .await
                    .map_err(|e| DatabaseError::Migration(e.to_string()))?;
                info!("Database migrations applied");

                (
                    Arc::new(PgUserRepository::new(pool.clone())),
                    Arc::new(PgInvoiceRepository::new(pool)),
                )
            }
            StorageBackend::Memory => {
                warn!("Using in-memory storage; data is lost on restart");
                (
                    Arc::new(InMemoryUserRepository::new()),
                    Arc::new(InMemoryInvoiceRepository::new()),
                )
            }
        };

    let credentials = Arc::new(CredentialService::new(
        users,
        jwt_service,
        PasswordHasher::default(),
    ));

    Ok(AppState::new(credentials, invoices))
}
