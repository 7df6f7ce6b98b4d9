/*
 * Responsibility
 * - todos CRUD (userId でスコープ)
 * - 所有者以外の todo は存在しないものとして扱う
 */
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TodoRow {
    #[sqlx(rename = "userId")]
    pub user_id: String,

    #[sqlx(rename = "todoId")]
    pub todo_id: Uuid,

    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    pub name: String,

    #[sqlx(rename = "dueDate")]
    pub due_date: String,

    pub done: bool,

    #[sqlx(rename = "attachmentUrl")]
    pub attachment_url: Option<String>,
}

/// Partial update; `None` leaves the column unchanged.
#[derive(Debug, Default, Clone)]
pub struct TodoChanges<'a> {
    pub name: Option<&'a str>,
    pub due_date: Option<&'a str>,
    pub done: Option<bool>,
}

impl TodoChanges<'_> {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.due_date.is_none() && self.done.is_none()
    }
}

pub async fn list_for_user(pool: &PgPool, user_id: &str) -> Result<Vec<TodoRow>, RepoError> {
    let rows = sqlx::query_as::<_, TodoRow>(
        r#"
        SELECT
            "userId", "todoId", "createdAt", name, "dueDate", done, "attachmentUrl"
        FROM todos
        WHERE "userId" = $1
        ORDER BY "createdAt" ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn create(
    pool: &PgPool,
    user_id: &str,
    todo_id: Uuid,
    name: &str,
    due_date: &str,
) -> Result<TodoRow, RepoError> {
    let row = sqlx::query_as::<_, TodoRow>(
        r#"
        INSERT INTO todos ("userId", "todoId", name, "dueDate", done)
        VALUES ($1, $2, $3, $4, FALSE)
        RETURNING
            "userId", "todoId", "createdAt", name, "dueDate", done, "attachmentUrl"
        "#,
    )
    .bind(user_id)
    .bind(todo_id)
    .bind(name)
    .bind(due_date)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Returns `None` when the todo does not exist for this user or nothing was given to change.
pub async fn update(
    pool: &PgPool,
    user_id: &str,
    todo_id: Uuid,
    changes: &TodoChanges<'_>,
) -> Result<Option<TodoRow>, RepoError> {
    if changes.is_empty() {
        return Ok(None);
    }

    let row = sqlx::query_as::<_, TodoRow>(
        r#"
        UPDATE todos
        SET
            name = COALESCE($3, name),
            "dueDate" = COALESCE($4, "dueDate"),
            done = COALESCE($5, done)
        WHERE "userId" = $1 AND "todoId" = $2
        RETURNING
            "userId", "todoId", "createdAt", name, "dueDate", done, "attachmentUrl"
        "#,
    )
    .bind(user_id)
    .bind(todo_id)
    .bind(changes.name)
    .bind(changes.due_date)
    .bind(changes.done)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn set_attachment_url(
    pool: &PgPool,
    user_id: &str,
    todo_id: Uuid,
    attachment_url: &str,
) -> Result<Option<TodoRow>, RepoError> {
    let row = sqlx::query_as::<_, TodoRow>(
        r#"
        UPDATE todos
        SET "attachmentUrl" = $3
        WHERE "userId" = $1 AND "todoId" = $2
        RETURNING
            "userId", "todoId", "createdAt", name, "dueDate", done, "attachmentUrl"
        "#,
    )
    .bind(user_id)
    .bind(todo_id)
    .bind(attachment_url)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn exists(pool: &PgPool, user_id: &str, todo_id: Uuid) -> Result<bool, RepoError> {
    let found: Option<i32> = sqlx::query_scalar(
        r#"
        SELECT 1
        FROM todos
        WHERE "userId" = $1 AND "todoId" = $2
        "#,
    )
    .bind(user_id)
    .bind(todo_id)
    .fetch_optional(pool)
    .await?;

    Ok(found.is_some())
}

pub async fn delete(pool: &PgPool, user_id: &str, todo_id: Uuid) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM todos
        WHERE "userId" = $1 AND "todoId" = $2
        "#,
    )
    .bind(user_id)
    .bind(todo_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
