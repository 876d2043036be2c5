//! Credential store and verifier
//!
//! Turns registration and login requests into signed tokens, and presented
//! tokens back into a live user identity.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{AuthError, AuthResult},
    jwt::JwtService,
    models::{AuthResponse, AuthUser, LoginRequest, NewUser, RegisterRequest, User, UserSummary},
    password::PasswordHasher,
    repositories::UserRepository,
    validation::{validate_email, validate_name, validate_password},
};

/// Credential service shared by the auth routes and the bearer middleware
pub struct CredentialService {
    users: Arc<dyn UserRepository>,
    jwt: JwtService,
    hasher: PasswordHasher,
    dummy_hash: OnceCell<String>,
}

impl CredentialService {
    /// Create a new credential service
    pub fn new(users: Arc<dyn UserRepository>, jwt: JwtService, hasher: PasswordHasher) -> Self {
        Self {
            users,
            jwt,
            hasher,
            dummy_hash: OnceCell::new(),
        }
    }

    /// Register a new user and issue a token for it
    pub async fn register(&self, request: RegisterRequest) -> AuthResult<AuthResponse> {
        validate_name(&request.name).map_err(AuthError::ValidationFailure)?;
        validate_email(&request.email).map_err(AuthError::ValidationFailure)?;
        validate_password(&request.password).map_err(AuthError::ValidationFailure)?;

        let password_hash = self.hasher.hash(&request.password).await?;

        let new_user = NewUser {
            name: request.name.trim().to_string(),
            email: request.email,
            password_hash,
        };

        let user = self.users.create(&new_user).await.map_err(|e| {
            if e.is_unique_violation() {
                warn!("Registration rejected: email already in use");
                AuthError::DuplicateIdentity
            } else {
                AuthError::StorageFailure(e)
            }
        })?;

        info!("Registered user {}", user.id);
        self.issue(&user)
    }

    /// Authenticate by email and password
    ///
    /// Unknown email and wrong password fail the same way, and both pay for
    /// one hash verification.
    pub async fn authenticate(&self, request: LoginRequest) -> AuthResult<AuthResponse> {
        let user = self.users.find_by_email(&request.email).await?;

        let Some(user) = user else {
            let dummy = self.dummy_hash().await?;
            let _ = self.hasher.verify(&request.password, dummy).await?;
            return Err(AuthError::InvalidCredentials);
        };

        if !self
            .hasher
            .verify(&request.password, &user.password_hash)
            .await?
        {
            return Err(AuthError::InvalidCredentials);
        }

        info!("User {} logged in", user.id);
        self.issue(&user)
    }

    /// Verify a bearer token and resolve it to an existing user
    pub async fn verify_token(&self, token: &str) -> AuthResult<AuthUser> {
        let claims = self
            .jwt
            .validate_token(token)
            .map_err(|_| AuthError::Unauthenticated)?;

        self.find_user(claims.sub)
            .await?
            .map(|user| AuthUser::from(&user))
            .ok_or(AuthError::Unauthenticated)
    }

    /// Whether the user store is reachable
    pub async fn health_check(&self) -> bool {
        self.users.health_check().await
    }

    async fn find_user(&self, id: Uuid) -> AuthResult<Option<User>> {
        Ok(self.users.find_by_id(id).await?)
    }

    fn issue(&self, user: &User) -> AuthResult<AuthResponse> {
        let token = self
            .jwt
            .generate_token(user.id)
            .map_err(|e| AuthError::Internal(format!("Failed to generate token: {}", e)))?;

        Ok(AuthResponse {
            token,
            user: UserSummary::from(user),
        })
    }

    async fn dummy_hash(&self) -> AuthResult<&String> {
        self.dummy_hash
            .get_or_try_init(|| self.hasher.hash("dummy-password-for-timing"))
            .await
    }
}
