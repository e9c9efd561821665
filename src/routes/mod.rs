pub mod admin;
pub mod auth;
pub mod health;
pub mod todos;
pub mod users;

use actix_web::web;

use crate::{auth::AuthMiddleware, error::AppError};

/// Registers every route. `/auth` is public; `/todo`, `/admin` and `/user` require a
/// bearer token.
///
/// The app must provide `web::Data` for `PgPool`, `TokenService` and `PasswordHasher`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::FormConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into()),
    )
    .service(
        web::scope("/auth")
            .service(auth::register)
            .service(auth::login),
    )
    .service(
        web::scope("/todo")
            .wrap(AuthMiddleware)
            .service(todos::list_todos)
            .service(todos::create_todo)
            .service(todos::get_todo)
            .service(todos::update_todo)
            .service(todos::delete_todo),
    )
    .service(
        web::scope("/admin")
            .wrap(AuthMiddleware)
            .service(admin::list_all_todos)
            .service(admin::delete_any_todo),
    )
    .service(
        web::scope("/user")
            .wrap(AuthMiddleware)
            .service(users::get_current_user)
            .service(users::change_password),
    );
}

/// Unwraps a numeric path id, rejecting ids below 1.
pub(crate) fn path_id(id: web::Path<i32>) -> Result<i32, AppError> {
    let id = id.into_inner();
    if id < 1 {
        return Err(AppError::ValidationError(format!(
            "id must be greater than or equal to 1, got {}",
            id
        )));
    }
    Ok(id)
}
