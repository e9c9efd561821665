use crate::{
    auth::{AdminUser, OwnerScope},
    error::AppError,
    models::Todo,
    routes::path_id,
};
use actix_web::{delete, get, web, HttpResponse, Responder};
use sqlx::PgPool;

/// Lists every todo of every owner. Admin only.
#[get("/todo")]
pub async fn list_all_todos(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
) -> Result<impl Responder, AppError> {
    let todos = Todo::list(pool.get_ref(), OwnerScope::All).await?;
    Ok(HttpResponse::Ok().json(todos))
}

/// Deletes any todo regardless of owner. Admin only.
#[delete("/todo/{id}")]
pub async fn delete_any_todo(
    pool: web::Data<PgPool>,
    todo_id: web::Path<i32>,
    admin: AdminUser,
) -> Result<impl Responder, AppError> {
    let id = path_id(todo_id)?;

    let mut tx = pool.begin().await?;
    if Todo::delete(&mut *tx, id, OwnerScope::All).await? == 0 {
        return Err(AppError::NotFound("Todo not found".into()));
    }
    tx.commit().await?;

    log::info!("Admin {} deleted todo {}", admin.0.id(), id);
    Ok(HttpResponse::NoContent().finish())
}
