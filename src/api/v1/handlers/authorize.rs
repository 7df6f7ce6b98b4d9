/*
 * Responsibility
 * - POST /authorize (API Gateway TOKEN authorizer)
 * - 常に 200 + Decision を返す。DENY を 401/403 に変換するのは gateway 側の責務
 * - 失敗理由はログにのみ出し、レスポンスには含めない
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::{
    api::v1::dto::authorize::AuthorizerEvent, services::authorizer::Decision, state::AppState,
};

pub async fn authorize(
    State(state): State<AppState>,
    event: Result<Json<AuthorizerEvent>, JsonRejection>,
) -> Json<Decision> {
    let event = match event {
        Ok(Json(event)) => event,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "unreadable authorizer event");
            AuthorizerEvent::default()
        }
    };

    tracing::debug!(
        event_type = ?event.event_type,
        method_arn = ?event.method_arn,
        "processing authorizer event"
    );

    let decision = state
        .authorizer
        .authorize(event.authorization_token.as_deref())
        .await;

    Json(decision)
}
