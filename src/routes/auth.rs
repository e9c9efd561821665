use crate::{
    auth::{authenticate, LoginForm, PasswordHasher, RegisterRequest, TokenResponse, TokenService},
    error::AppError,
    models::{NewUser, User, UserResponse},
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Register a new user
///
/// Creates an identity with a bcrypt-hashed password and returns it without the digest.
///
/// ## Responses:
/// - `201 Created`: the new `UserResponse`.
/// - `400 Bad Request`: malformed JSON, or the username or email is already taken.
/// - `422 Unprocessable Entity`: a field failed validation.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    hasher: web::Data<PasswordHasher>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;
    let request = register_data.into_inner();

    let hashed_password = hasher.hash_blocking(request.password).await?;

    let mut tx = pool.begin().await?;
    let user = User::insert(
        &mut *tx,
        &NewUser {
            username: &request.username,
            email: &request.email,
            hashed_password: &hashed_password,
            name: &request.name,
            role: request.role,
        },
    )
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::BadRequest("Username or email already registered".into())
        }
        other => other.into(),
    })?;
    tx.commit().await?;

    log::info!("Registered user {} with role {}", user.id, user.role);
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Login user
///
/// Accepts form-encoded `username` and `password` and returns a bearer token.
///
/// ## Responses:
/// - `200 OK`: `{"access_token": "...", "token_type": "bearer"}`.
/// - `400 Bad Request`: a form field is missing.
/// - `401 Unauthorized`: the credentials were not accepted.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    hasher: web::Data<PasswordHasher>,
    tokens: web::Data<TokenService>,
    form: web::Form<LoginForm>,
) -> Result<impl Responder, AppError> {
    let user = authenticate(pool.get_ref(), hasher.get_ref(), &form.username, &form.password)
        .await?;
    let access_token = tokens.issue_access_token(&user)?;

    log::info!("User {} logged in", user.id);
    Ok(HttpResponse::Ok().json(TokenResponse::bearer(access_token)))
}
