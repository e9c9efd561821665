use crate::{
    auth::{AuthenticatedUser, PasswordHasher},
    error::AppError,
    models::{PasswordChangeRequest, User, UserResponse},
};
use actix_web::{get, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Returns the caller's own identity record, without the password digest.
#[get("")]
pub async fn get_current_user(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let record = User::find_by_id(pool.get_ref(), user.id())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(record)))
}

/// Changes the caller's password after re-checking the current one.
///
/// ## Responses:
/// - `204 No Content`: the password was changed.
/// - `401 Unauthorized`: the current password is wrong; the stored digest is untouched.
/// - `422 Unprocessable Entity`: either password is shorter than 8 or longer than 100 characters.
#[put("/password")]
pub async fn change_password(
    pool: web::Data<PgPool>,
    hasher: web::Data<PasswordHasher>,
    password_data: web::Json<PasswordChangeRequest>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    password_data.validate()?;
    let request = password_data.into_inner();

    let record = User::find_by_id(pool.get_ref(), user.id())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    // Hashing happens before the transaction opens so no row lock is held meanwhile.
    if !hasher
        .verify_blocking(request.password, record.hashed_password.clone())
        .await?
    {
        log::info!("User {} supplied a wrong current password", user.id());
        return Err(AppError::Unauthorized("Invalid password".into()));
    }
    let new_hash = hasher.hash_blocking(request.new_password).await?;

    let mut tx = pool.begin().await?;
    let changed =
        User::replace_password(&mut *tx, record.id, &record.hashed_password, &new_hash).await?;
    if changed == 0 {
        log::warn!("Password of user {} changed concurrently", user.id());
        return Err(AppError::Unauthorized("Invalid password".into()));
    }
    tx.commit().await?;

    log::info!("User {} changed their password", user.id());
    Ok(HttpResponse::NoContent().finish())
}
