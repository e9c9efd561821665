use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::scope::OwnerScope;
use crate::auth::token::Claims;
use crate::error::AppError;
use crate::models::Role;

/// The identity resolved from a verified access token.
///
/// Populated by `AuthMiddleware`, which stores the token's `Claims` in the request
/// extensions. Extraction fails with `AppError::Unauthorized` when no claims are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    id: i32,
    username: String,
    role: Role,
}

impl AuthenticatedUser {
    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Owner filter for todo operations: admins are unrestricted.
    pub fn scope(&self) -> OwnerScope {
        if self.is_admin() {
            OwnerScope::All
        } else {
            OwnerScope::Owner(self.id)
        }
    }
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            username: claims.sub,
            role: claims.role,
        }
    }
}

fn resolve(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    match req.extensions().get::<Claims>().cloned() {
        Some(claims) => Ok(AuthenticatedUser::from(claims)),
        None => {
            log::warn!("No verified claims on {}; is AuthMiddleware applied?", req.path());
            Err(AppError::Unauthorized("Could not validate credentials".to_string()))
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(resolve(req).map_err(Into::into))
    }
}

/// An `AuthenticatedUser` whose role is `admin`.
///
/// Any other role is rejected with `AppError::Forbidden`.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

impl FromRequest for AdminUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = match resolve(req) {
            Ok(user) => user,
            Err(e) => return ready(Err(e.into())),
        };

        if user.is_admin() {
            ready(Ok(AdminUser(user)))
        } else {
            log::info!("User {} denied admin access to {}", user.id(), req.path());
            ready(Err(AppError::Forbidden("Admin role required".to_string()).into()))
        }
    }
}
