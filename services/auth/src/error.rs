//! Error type for credential handling

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Malformed or missing input
    #[error("Validation failed: {0}")]
    ValidationFailure(String),

    /// Email already registered
    #[error("Duplicate identity")]
    DuplicateIdentity,

    /// Unknown email or wrong password, deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, expired or forged token, or the user is gone
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Underlying store failed
    #[error("Storage failure: {0}")]
    StorageFailure(#[from] DatabaseError),

    /// Hashing or signing failed
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::ValidationFailure(rejection.body_text())
    }
}

impl AuthError {
    /// HTTP status this error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::ValidationFailure(_) | AuthError::DuplicateIdentity => {
                StatusCode::BAD_REQUEST
            }
            AuthError::InvalidCredentials | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::StorageFailure(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short client-facing message
    pub fn public_message(&self) -> String {
        match self {
            AuthError::ValidationFailure(msg) => msg.clone(),
            AuthError::DuplicateIdentity => "Registration failed".to_string(),
            AuthError::InvalidCredentials => "Invalid login credentials".to_string(),
            AuthError::Unauthenticated => "Please authenticate.".to_string(),
            AuthError::StorageFailure(_) | AuthError::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Authentication request failed: {}", self);
        }

        let body = Json(json!({
            "error": self.public_message(),
        }));

        (status, body).into_response()
    }
}

/// Type alias for authentication results
pub type AuthResult<T> = Result<T, AuthError>;
