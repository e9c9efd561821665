use crate::error::AppError;
use crate::models::{Role, User};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// The claims carried by an access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the username.
    pub sub: String,
    /// Identity id of the subject.
    pub id: i32,
    pub role: Role,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Issues and verifies HS256 access tokens with a shared secret.
///
/// Built once at startup from configuration and shared read-only between workers.
/// Verification is strict: no leeway is applied to `exp`.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, access_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_ttl,
        }
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Encodes `{sub: username, id, role, exp: now + ttl}` into a signed token.
    pub fn issue(
        &self,
        user_id: i32,
        username: &str,
        role: Role,
        ttl: Duration,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: username.to_string(),
            id: user_id,
            role,
            exp: (Utc::now() + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Issues a token for `user` with the configured access lifetime.
    pub fn issue_access_token(&self, user: &User) -> Result<String, AppError> {
        self.issue(user.id, &user.username, user.role, self.access_ttl)
    }

    /// Checks signature, algorithm and expiry, returning the decoded claims.
    ///
    /// Every failure yields the same `AppError::Unauthorized`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        Ok(decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims)
    }
}
