use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;

pub mod context;

pub use context::CallContext;

/// Sentinel authority that bypasses every tenant check.
pub const SYS_ADMIN_ROOT: &str = "SYS_ADMIN_ROOT";

pub const ORGANIZATION_READ: &str = "ORGANIZATION_READ";
pub const ORGANIZATION_CREATE: &str = "ORGANIZATION_CREATE";
pub const ORGANIZATION_UPDATE: &str = "ORGANIZATION_UPDATE";
pub const ORGANIZATION_DELETE: &str = "ORGANIZATION_DELETE";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub authorities: Vec<String>,
    #[serde(rename = "organizationId", skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<Uuid>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(subject: String, authorities: Vec<String>, organization_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        let expiration_ms = config::config().security.jwt_expiration_ms;
        let exp = (now + Duration::milliseconds(expiration_ms as i64)).timestamp();

        Self {
            sub: subject,
            authorities,
            organization_id,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidSecret,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidSecret => write!(f, "Invalid JWT secret"),
        }
    }
}

impl std::error::Error for JwtError {}

pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    let secret = &config::config().security.jwt_secret;
    generate_jwt_with_secret(claims, secret)
}

/// Sign claims with an explicit base64-encoded secret. Split out so tests can
/// mint tokens without touching the config singleton.
pub fn generate_jwt_with_secret(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key =
        EncodingKey::from_base64_secret(secret).map_err(|_| JwtError::InvalidSecret)?;
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}
