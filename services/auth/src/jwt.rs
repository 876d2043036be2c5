//! JWT service for token generation and validation
//!
//! Tokens are self-contained: they carry the user ID, issue time and expiry
//! and are verified without any server-side session table. Signing uses
//! HS256 with a shared secret, or RS256 when a PEM key pair is configured.

use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Default token lifetime: 7 days
pub const DEFAULT_TOKEN_EXPIRY: u64 = 604800;

/// Signing material
#[derive(Clone)]
pub enum JwtKeys {
    /// Shared HMAC secret (HS256)
    Secret(String),
    /// PEM-encoded RSA key pair (RS256)
    Rsa {
        private_key: String,
        public_key: String,
    },
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtKeys::Secret(_) => f.write_str("Secret(<redacted>)"),
            JwtKeys::Rsa { .. } => f.write_str("Rsa(<redacted>)"),
        }
    }
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Keys used to sign and verify tokens
    pub keys: JwtKeys,
    /// Token expiration time in seconds (default: 7 days)
    pub token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_PRIVATE_KEY`: Private key (PEM format) or path to private key file
    /// - `JWT_PUBLIC_KEY`: Public key (PEM format) or path to public key file
    /// - `JWT_SECRET`: Shared secret, used when the key pair is not set
    /// - `JWT_TOKEN_EXPIRY`: Token expiry in seconds (default: 604800)
    pub fn from_env() -> Result<Self> {
        let private_key = std::env::var("JWT_PRIVATE_KEY").ok();
        let public_key = std::env::var("JWT_PUBLIC_KEY").ok();

        let keys = match (private_key, public_key) {
            (Some(private_key), Some(public_key)) => JwtKeys::Rsa {
                private_key: read_pem("private", private_key)?,
                public_key: read_pem("public", public_key)?,
            },
            (Some(_), None) | (None, Some(_)) => {
                anyhow::bail!("JWT_PRIVATE_KEY and JWT_PUBLIC_KEY must be set together")
            }
            (None, None) => {
                let secret = std::env::var("JWT_SECRET").map_err(|_| {
                    anyhow::anyhow!("JWT_SECRET or JWT_PRIVATE_KEY/JWT_PUBLIC_KEY must be set")
                })?;
                JwtKeys::Secret(secret)
            }
        };

        let token_expiry = std::env::var("JWT_TOKEN_EXPIRY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TOKEN_EXPIRY);

        Ok(JwtConfig { keys, token_expiry })
    }

    /// Configuration with a shared secret and the default expiry
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            keys: JwtKeys::Secret(secret.into()),
            token_expiry: DEFAULT_TOKEN_EXPIRY,
        }
    }
}

/// Accept inline PEM or a path to a PEM file (CWD first, then crate root)
fn read_pem(kind: &str, value: String) -> Result<String> {
    if value.starts_with("-----BEGIN") {
        return Ok(value);
    }

    std::fs::read_to_string(&value)
        .or_else(|_| {
            let mut path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
            path.push(&value);
            std::fs::read_to_string(path)
        })
        .map(|pem| pem.trim().to_string())
        .map_err(|e| anyhow::anyhow!("Failed to read {} key file: {}", kind, e))
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    header: Header,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Result<Self> {
        let (encoding_key, decoding_key, algorithm) = match &config.keys {
            JwtKeys::Secret(secret) => {
                if secret.is_empty() {
                    anyhow::bail!("JWT secret must not be empty");
                }
                (
                    EncodingKey::from_secret(secret.as_bytes()),
                    DecodingKey::from_secret(secret.as_bytes()),
                    Algorithm::HS256,
                )
            }
            JwtKeys::Rsa {
                private_key,
                public_key,
            } => (
                EncodingKey::from_rsa_pem(private_key.as_bytes())?,
                DecodingKey::from_rsa_pem(public_key.as_bytes())?,
                Algorithm::RS256,
            ),
        };

        let mut validation = Validation::new(algorithm);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(JwtService {
            encoding_key,
            decoding_key,
            header: Header::new(algorithm),
            validation,
            config,
        })
    }

    /// Generate a token asserting the given user authenticated now
    pub fn generate_token(&self, user_id: Uuid) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
            .as_secs();

        let claims = Claims {
            sub: user_id,
            iat: now,
            exp: now + self.config.token_expiry,
        };

        self.sign(&claims)
    }

    /// Sign arbitrary claims
    pub fn sign(&self, claims: &Claims) -> Result<String> {
        let token = encode(&self.header, claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a token and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}
