use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use validator::Validate;

use crate::auth::OwnerScope;

/// Input structure for creating or replacing a todo.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TodoInput {
    /// Must be between 3 and 100 characters.
    #[validate(length(min = 3, max = 100))]
    pub title: String,

    /// Must be between 3 and 200 characters.
    #[validate(length(min = 3, max = 200))]
    pub description: String,

    /// 1 (lowest) to 5 (highest), inclusive.
    #[validate(range(min = 1, max = 5))]
    pub priority: i16,

    pub complete: bool,
}

/// A todo as stored in the `todos` table and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub priority: i16,
    pub complete: bool,
    /// The identity that owns this todo.
    pub owner_id: i32,
}

const TODO_COLUMNS: &str = "id, title, description, priority, complete, owner_id";

// `$n::INT4 IS NULL` lets a single statement serve both scoped and unscoped callers.
impl Todo {
    pub async fn list<'e, E>(executor: E, scope: OwnerScope) -> Result<Vec<Todo>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Todo>(&format!(
            "SELECT {} FROM todos WHERE ($1::INT4 IS NULL OR owner_id = $1) ORDER BY id",
            TODO_COLUMNS
        ))
        .bind(scope.owner_id())
        .fetch_all(executor)
        .await
    }

    pub async fn find<'e, E>(
        executor: E,
        id: i32,
        scope: OwnerScope,
    ) -> Result<Option<Todo>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Todo>(&format!(
            "SELECT {} FROM todos WHERE id = $1 AND ($2::INT4 IS NULL OR owner_id = $2)",
            TODO_COLUMNS
        ))
        .bind(id)
        .bind(scope.owner_id())
        .fetch_optional(executor)
        .await
    }

    pub async fn insert<'e, E>(
        executor: E,
        input: &TodoInput,
        owner_id: i32,
    ) -> Result<Todo, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Todo>(&format!(
            "INSERT INTO todos (title, description, priority, complete, owner_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            TODO_COLUMNS
        ))
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.priority)
        .bind(input.complete)
        .bind(owner_id)
        .fetch_one(executor)
        .await
    }

    /// Replaces the mutable fields in place. `None` means no row matched `id` within `scope`.
    pub async fn update<'e, E>(
        executor: E,
        id: i32,
        scope: OwnerScope,
        input: &TodoInput,
    ) -> Result<Option<Todo>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Todo>(&format!(
            "UPDATE todos
             SET title = $1, description = $2, priority = $3, complete = $4
             WHERE id = $5 AND ($6::INT4 IS NULL OR owner_id = $6)
             RETURNING {}",
            TODO_COLUMNS
        ))
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.priority)
        .bind(input.complete)
        .bind(id)
        .bind(scope.owner_id())
        .fetch_optional(executor)
        .await
    }

    /// Returns the number of rows removed, 0 when nothing matched `id` within `scope`.
    pub async fn delete<'e, E>(executor: E, id: i32, scope: OwnerScope) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result =
            sqlx::query("DELETE FROM todos WHERE id = $1 AND ($2::INT4 IS NULL OR owner_id = $2)")
                .bind(id)
                .bind(scope.owner_id())
                .execute(executor)
                .await?;
        Ok(result.rows_affected())
    }
}
