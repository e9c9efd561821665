pub mod authenticator;
pub mod extractors;
pub mod middleware;
pub mod password;
pub mod scope;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Role;

pub use authenticator::authenticate;
pub use extractors::{AdminUser, AuthenticatedUser};
pub use middleware::AuthMiddleware;
pub use password::PasswordHasher;
pub use scope::OwnerScope;
pub use token::{Claims, TokenService};

lazy_static! {
    // Regex for username validation: alphanumeric, underscores, hyphens, dots
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[a-zA-Z0-9_.-]+$").unwrap();
}

/// Form fields accepted by `POST /auth/login` (`application/x-www-form-urlencoded`).
///
/// Extra OAuth2 password-grant fields such as `grant_type` or `scope` are ignored.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Between 3 and 100 characters: letters, digits, `_`, `-` or `.`.
    #[validate(
        length(min = 3, max = 100),
        regex(
            path = "USERNAME_REGEX",
            message = "Username must be alphanumeric, underscores, hyphens or dots"
        )
    )]
    pub username: String,
    #[validate(length(min = 8, max = 100))]
    pub password: String,
    #[validate(email, length(max = 50))]
    pub email: String,
    /// Display name.
    #[validate(length(min = 3, max = 100))]
    pub name: String,
    #[serde(default)]
    pub role: Role,
}

/// Response body of a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}
