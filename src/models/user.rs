use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgValueRef, Decode, FromRow, PgExecutor, Postgres, Type};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// The role tag attached to every identity.
///
/// Stored and transmitted as a lowercase string (`"user"`, `"admin"`).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown role: {:?}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

// The column is plain TEXT; decoding goes through `&str` so an unexpected tag fails loudly.
impl Type<Postgres> for Role {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <&str as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <&str as Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for Role {
    fn decode(value: PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let tag = <&'r str as Decode<'r, Postgres>>::decode(value)?;
        Ok(tag.parse::<Role>()?)
    }
}

/// A persisted identity, including its password digest.
///
/// Never serialized directly; responses go through [`UserResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub hashed_password: String,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
}

/// Public view of a `User`, without the password digest.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            name: user.name,
            role: user.role,
            is_active: user.is_active,
        }
    }
}

/// Payload for `PUT /user/password`.
#[derive(Debug, Deserialize, Validate)]
pub struct PasswordChangeRequest {
    /// The caller's current password.
    #[validate(length(min = 8, max = 100))]
    pub password: String,
    #[validate(length(min = 8, max = 100))]
    pub new_password: String,
}

/// Fields needed to insert a new identity; the password is already hashed.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub hashed_password: &'a str,
    pub name: &'a str,
    pub role: Role,
}

const USER_COLUMNS: &str = "id, username, email, hashed_password, name, role, is_active";

impl User {
    pub async fn find_by_username<'e, E>(
        executor: E,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(executor)
        .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: i32) -> Result<Option<User>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn insert<'e, E>(executor: E, new_user: &NewUser<'_>) -> Result<User, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, hashed_password, name, role, is_active)
             VALUES ($1, $2, $3, $4, $5, TRUE)
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(new_user.username)
        .bind(new_user.email)
        .bind(new_user.hashed_password)
        .bind(new_user.name)
        .bind(new_user.role.as_str())
        .fetch_one(executor)
        .await
    }

    /// Swaps the digest only if it still equals `current_hash`.
    ///
    /// Returns the number of rows changed; 0 means the user is gone or the password was
    /// changed by someone else in the meantime.
    pub async fn replace_password<'e, E>(
        executor: E,
        id: i32,
        current_hash: &str,
        new_hash: &str,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE users SET hashed_password = $1 WHERE id = $2 AND hashed_password = $3",
        )
        .bind(new_hash)
        .bind(id)
        .bind(current_hash)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
