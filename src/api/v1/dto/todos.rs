/*
 * Responsibility
 * - Todos の request/response DTO (JSON は camelCase)
 * - validation (形式チェック) 用の validate() を持つ
 */
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::todo_repo::{TodoChanges, TodoRow};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    pub name: String,
    pub due_date: String,
}

impl CreateTodoRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        if self.due_date.trim().is_empty() {
            return Err("dueDate is required");
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    pub name: Option<String>,
    pub due_date: Option<String>,
    pub done: Option<bool>,
}

impl UpdateTodoRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err("name cannot be empty");
        }
        if let Some(due_date) = &self.due_date
            && due_date.trim().is_empty()
        {
            return Err("dueDate cannot be empty");
        }
        if self.changes().is_empty() {
            return Err("no fields to update");
        }

        Ok(())
    }

    pub fn changes(&self) -> TodoChanges<'_> {
        TodoChanges {
            name: self.name.as_deref(),
            due_date: self.due_date.as_deref(),
            done: self.done,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    pub user_id: String,
    pub todo_id: Uuid,
    pub created_at: String, // ISO 8601, millisecond precision
    pub name: String,
    pub due_date: String,
    pub done: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
}

impl From<TodoRow> for TodoResponse {
    fn from(row: TodoRow) -> Self {
        Self {
            user_id: row.user_id,
            todo_id: row.todo_id,
            created_at: row.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            name: row.name,
            due_date: row.due_date,
            done: row.done,
            attachment_url: row.attachment_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TodoListResponse {
    pub items: Vec<TodoResponse>,
}

#[derive(Debug, Serialize)]
pub struct TodoItemResponse {
    pub item: TodoResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlResponse {
    pub upload_url: String,
}
