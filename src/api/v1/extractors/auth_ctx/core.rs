use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;

use super::AuthCtx;

/// todo handler が token の所有者 (sub) を受け取るための extractor
///
/// `middleware::auth::access` が検証済みの AuthCtx を extensions に入れている前提。
/// 無い場合は route に middleware が掛かっていないので、ログを残して 401 にする。
pub struct AuthCtxExtractor(pub AuthCtx);

impl FromRequestParts<AppState> for AuthCtxExtractor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<AuthCtx>() {
            Some(ctx) => Ok(AuthCtxExtractor(ctx.clone())),
            None => {
                tracing::error!(path = %parts.uri.path(), "AuthCtx missing; route is not behind access middleware");
                Err(AppError::Unauthorized)
            }
        }
    }
}
