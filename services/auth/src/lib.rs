//! Credential store and verifier
//!
//! Owns user records and the bearer tokens asserting them: registration,
//! login, token verification, and the HTTP surface for both.

use std::sync::Arc;

pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repositories;
pub mod routes;
pub mod service;
pub mod validation;

pub use error::{AuthError, AuthResult};
pub use models::AuthUser;
pub use service::CredentialService;

/// Credential service handle shared across handlers
pub type SharedCredentials = Arc<CredentialService>;
