use sqlx::SqlitePool;
use tracing::debug;

use crate::models::{NewTodoRequest, Todo, UpdateTodoRequest};

pub async fn fetch_todos(db: &SqlitePool) -> Result<Vec<Todo>, sqlx::Error> {
    sqlx::query_as::<_, Todo>(
        "SELECT id, title, description, is_done FROM todos ORDER BY id"
    )
    .fetch_all(db)
    .await
}

pub async fn find_todo_by_id(db: &SqlitePool, id: i64) -> Result<Option<Todo>, sqlx::Error> {
    sqlx::query_as::<_, Todo>(
        "SELECT id, title, description, is_done FROM todos WHERE id = ?"
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_todo(
    db: &SqlitePool,
    req: NewTodoRequest,
) -> Result<Todo, sqlx::Error> {
    let id = sqlx::query(
        r#"
        INSERT INTO todos (title, description, is_done)
        VALUES (?1, ?2, 0)
        "#
    )
    .bind(&req.title)
    .bind(&req.description)
    .execute(db)
    .await?
    .last_insert_rowid();

    debug!(id, "inserted todo");

    Ok(Todo {
        id,
        title: req.title,
        description: req.description,
        is_done: false,
    })
}

/// Writes only the fields present in `req`, in a single statement, so
/// concurrent partial updates of one row never undo each other. Returns
/// `None` when no row has this id.
pub async fn update_todo(
    db: &SqlitePool,
    id: i64,
    req: UpdateTodoRequest,
) -> Result<Option<Todo>, sqlx::Error> {
    let (has_description, description) = match req.description {
        Some(description) => (true, description),
        None => (false, None),
    };

    let updated = sqlx::query_as::<_, Todo>(
        r#"
        UPDATE todos
        SET title = COALESCE(?1, title),
            description = CASE WHEN ?2 THEN ?3 ELSE description END,
            is_done = COALESCE(?4, is_done)
        WHERE id = ?5
        RETURNING id, title, description, is_done
        "#
    )
    .bind(req.title)
    .bind(has_description)
    .bind(description)
    .bind(req.is_done)
    .bind(id)
    .fetch_optional(db)
    .await?;

    debug!(id, updated = updated.is_some(), "update todo");
    Ok(updated)
}

pub async fn delete_todo(db: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    debug!(id, deleted = result > 0, "delete todo");
    Ok(result > 0)
}
