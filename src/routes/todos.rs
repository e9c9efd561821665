use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{Todo, TodoInput},
    routes::path_id,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

fn todo_not_found() -> AppError {
    AppError::NotFound("Todo not found".into())
}

/// Lists the caller's todos, ordered by id. Admins get every owner's todos.
#[get("")]
pub async fn list_todos(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let todos = Todo::list(pool.get_ref(), user.scope()).await?;
    Ok(HttpResponse::Ok().json(todos))
}

/// Retrieves a single todo.
///
/// ## Responses:
/// - `200 OK`: the `Todo`.
/// - `404 Not Found`: no such id, or it belongs to someone else (unless the caller is an admin).
/// - `422 Unprocessable Entity`: `id` is below 1.
#[get("/{id}")]
pub async fn get_todo(
    pool: web::Data<PgPool>,
    todo_id: web::Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let id = path_id(todo_id)?;

    let todo = Todo::find(pool.get_ref(), id, user.scope())
        .await?
        .ok_or_else(todo_not_found)?;

    Ok(HttpResponse::Ok().json(todo))
}

/// Creates a todo owned by the caller.
///
/// ## Responses:
/// - `201 Created`: the new `Todo`, with `owner_id` set to the caller.
/// - `400 Bad Request`: malformed JSON or a missing field.
/// - `401 Unauthorized`: the token's identity has since been deleted.
/// - `422 Unprocessable Entity`: a field is out of range.
#[post("")]
pub async fn create_todo(
    pool: web::Data<PgPool>,
    todo_data: web::Json<TodoInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    todo_data.validate()?;

    let mut tx = pool.begin().await?;
    let todo = Todo::insert(&mut *tx, &todo_data, user.id())
        .await
        .map_err(|e| match e {
            // The token is genuine but its identity no longer exists.
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                log::info!("Rejecting todo for deleted user {}", user.id());
                AppError::Unauthorized("Could not validate credentials".into())
            }
            other => other.into(),
        })?;
    tx.commit().await?;

    log::debug!("User {} created todo {}", user.id(), todo.id);
    Ok(HttpResponse::Created().json(todo))
}

/// Replaces title, description, priority and completion of a todo.
///
/// Same visibility rules and error statuses as `GET /todo/{id}`, plus 400/422 for the body.
#[put("/{id}")]
pub async fn update_todo(
    pool: web::Data<PgPool>,
    todo_id: web::Path<i32>,
    todo_data: web::Json<TodoInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let id = path_id(todo_id)?;
    todo_data.validate()?;

    let mut tx = pool.begin().await?;
    let todo = Todo::update(&mut *tx, id, user.scope(), &todo_data)
        .await?
        .ok_or_else(todo_not_found)?;
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(todo))
}

/// Deletes a todo.
///
/// ## Responses:
/// - `204 No Content`: deleted.
/// - `404 Not Found`: no such id, or it belongs to someone else (unless the caller is an admin).
#[delete("/{id}")]
pub async fn delete_todo(
    pool: web::Data<PgPool>,
    todo_id: web::Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let id = path_id(todo_id)?;

    let mut tx = pool.begin().await?;
    if Todo::delete(&mut *tx, id, user.scope()).await? == 0 {
        return Err(todo_not_found());
    }
    tx.commit().await?;

    log::debug!("User {} deleted todo {}", user.id(), id);
    Ok(HttpResponse::NoContent().finish())
}
