use sqlx::PgPool;

use crate::auth::password::PasswordHasher;
use crate::error::AppError;
use crate::models::User;

const INVALID_CREDENTIALS: &str = "Incorrect username or password";

/// Looks up `username` and checks `password` against its stored digest.
///
/// Unknown users, wrong passwords and deactivated accounts all produce the same
/// `AppError::Unauthorized`, so callers cannot probe which usernames exist. An unknown
/// username still pays for one bcrypt check so response time does not tell them apart.
pub async fn authenticate(
    pool: &PgPool,
    hasher: &PasswordHasher,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    let user = match User::find_by_username(pool, username).await? {
        Some(user) => user,
        None => {
            log::debug!("Login failed: no such user");
            hasher.verify_missing_blocking(password.to_string()).await?;
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }
    };

    let matches = hasher
        .verify_blocking(password.to_string(), user.hashed_password.clone())
        .await?;

    if !matches {
        log::debug!("Login failed: wrong password for user {}", user.id);
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }
    if !user.is_active {
        log::info!("Login refused for inactive user {}", user.id);
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    Ok(user)
}
