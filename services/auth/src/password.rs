//! Argon2 password hashing
//!
//! Hashing is CPU-bound and deliberately slow, so both operations run on
//! tokio's blocking pool and are awaited by the caller.

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version,
    password_hash::SaltString,
};
use tokio::task;

use crate::error::{AuthError, AuthResult};

/// Salted one-way password hasher
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl PasswordHasher {
    /// Create a hasher with explicit Argon2id cost parameters
    pub fn with_params(memory_kib: u32, iterations: u32, parallelism: u32) -> AuthResult<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AuthError::Internal(format!("Invalid Argon2 parameters: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a plaintext password into a PHC string
    pub async fn hash(&self, password: &str) -> AuthResult<String> {
        let argon2 = self.argon2.clone();
        let password = password.to_owned();

        task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut rand::thread_rng());
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| AuthError::Internal(format!("Failed to hash password: {}", e)))
        })
        .await
        .map_err(|e| AuthError::Internal(format!("Hashing task failed: {}", e)))?
    }

    /// Check a plaintext password against a stored PHC string
    ///
    /// The cost parameters encoded in the stored hash are the ones used.
    pub async fn verify(&self, password: &str, password_hash: &str) -> AuthResult<bool> {
        let argon2 = self.argon2.clone();
        let password = password.to_owned();
        let password_hash = password_hash.to_owned();

        task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| AuthError::Internal(format!("Failed to parse password hash: {}", e)))?;

            Ok(argon2
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok())
        })
        .await
        .map_err(|e| AuthError::Internal(format!("Verification task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::with_params(8, 1, 1).unwrap()
    }

    #[tokio::test]
    async fn hash_never_contains_plaintext() {
        let hash = hasher().hash("pw123").await.unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("pw123"));
    }

    #[tokio::test]
    async fn verify_accepts_the_right_password_only() {
        let hasher = hasher();
        let hash = hasher.hash("pw123").await.unwrap();

        assert!(hasher.verify("pw123", &hash).await.unwrap());
        assert!(!hasher.verify("pw124", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn same_password_gets_different_salts() {
        let hasher = hasher();
        let first = hasher.hash("pw123").await.unwrap();
        let second = hasher.hash("pw123").await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn corrupt_hash_is_an_internal_error() {
        let result = hasher().verify("pw123", "not-a-phc-string").await;
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }

    #[test]
    fn invalid_params_are_rejected() {
        assert!(PasswordHasher::with_params(0, 0, 0).is_err());
    }
}
