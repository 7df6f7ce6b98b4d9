/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /authorize は gateway 用 (常に Decision を返す)、/todos 系は Bearer 必須
 * - Bearer が必要な範囲はここで middleware::auth::access を適用して決める
 */
use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::middleware::auth::access;
use crate::state::AppState;

use crate::api::v1::handlers::{
    authorize::authorize,
    todos::{create_attachment_url, create_todo, delete_todo, list_todos, update_todo},
};

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{todo_id}", patch(update_todo).delete(delete_todo))
        .route("/todos/{todo_id}/attachment", post(create_attachment_url));

    Router::new()
        .route("/authorize", post(authorize))
        .merge(access::apply(protected, state))
}
