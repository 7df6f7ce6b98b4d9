/*
 * Responsibility
 * - /todos 系 CRUD handler + 添付ファイルのアップロード URL 発行
 * - 所有者は middleware が検証した AuthCtx.user_id (token の sub) のみ
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::todos::{
            CreateTodoRequest, TodoItemResponse, TodoListResponse, UpdateTodoRequest,
            UploadUrlResponse,
        },
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    repos::todo_repo,
    state::AppState,
};

pub async fn list_todos(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
) -> Result<Json<TodoListResponse>, AppError> {
    let rows = todo_repo::list_for_user(&state.db, &auth.user_id).await?;

    tracing::info!(user_id = %auth.user_id, kid = ?auth.kid, count = rows.len(), "retrieved todos");

    Ok(Json(TodoListResponse {
        items: rows.into_iter().map(Into::into).collect(),
    }))
}

pub async fn create_todo(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Json(req): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<TodoItemResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_TODO", msg))?;

    let todo_id = Uuid::new_v4();
    let row = todo_repo::create(&state.db, &auth.user_id, todo_id, &req.name, &req.due_date).await?;

    tracing::info!(user_id = %auth.user_id, kid = ?auth.kid, todo_id = %todo_id, "todo created");

    Ok((
        StatusCode::CREATED,
        Json(TodoItemResponse { item: row.into() }),
    ))
}

pub async fn update_todo(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Path(todo_id): Path<Uuid>,
    Json(req): Json<UpdateTodoRequest>,
) -> Result<Json<TodoItemResponse>, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_TODO", msg))?;

    let row = todo_repo::update(&state.db, &auth.user_id, todo_id, &req.changes())
        .await?
        .ok_or(AppError::not_found("todo"))?;

    tracing::info!(user_id = %auth.user_id, kid = ?auth.kid, todo_id = %todo_id, "todo updated");

    Ok(Json(TodoItemResponse { item: row.into() }))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Path(todo_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    // idempotent: deleting a missing (or foreign) todo is still 204
    let deleted = todo_repo::delete(&state.db, &auth.user_id, todo_id).await?;

    tracing::info!(user_id = %auth.user_id, kid = ?auth.kid, todo_id = %todo_id, deleted, "todo deleted");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_attachment_url(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Path(todo_id): Path<Uuid>,
) -> Result<Json<UploadUrlResponse>, AppError> {
    let attachments = state
        .attachments
        .as_ref()
        .ok_or(AppError::Unavailable {
            feature: "attachments",
        })?;

    if !todo_repo::exists(&state.db, &auth.user_id, todo_id).await? {
        return Err(AppError::not_found("todo"));
    }

    let object_id = todo_id.to_string();
    let upload_url = attachments
        .issue_upload_url(&object_id, attachments.url_expiration_seconds())
        .await?;
    let attachment_url = attachments.public_url(&object_id);

    todo_repo::set_attachment_url(&state.db, &auth.user_id, todo_id, &attachment_url)
        .await?
        .ok_or(AppError::not_found("todo"))?;

    tracing::info!(
        user_id = %auth.user_id,
        kid = ?auth.kid,
        todo_id = %todo_id,
        "presigned URL created and attachment URL updated"
    );

    Ok(Json(UploadUrlResponse { upload_url }))
}
