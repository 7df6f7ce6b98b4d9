//! Bearer token 検証 → AuthCtx を extensions に入れる
//!
//! - `Authorization: Bearer <jwt>` を TokenAuthorizer で検証する (JWKS 証明書 + RS256 + exp/nbf)
//! - 成功時は `sub` を `AuthCtx.user_id` として extensions に格納する
//! - 失敗理由はログにのみ出し、レスポンスは常に同じ 401

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// 認証が必要な route に middleware を適用する。
///
/// 例：
/// ```ignore
/// let protected = Router::new().route("/todos", get(list_todos));
/// let protected = middleware::auth::access::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // 非 UTF-8 のヘッダは欠落と同じ扱い (MissingCredential)
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    // VerificationError → AppError::Unauthorized (理由はログのみ)
    let verified = state.authorizer.verify(authorization).await?;

    let auth_ctx = AuthCtx::new(verified.principal_id).with_kid(verified.kid);

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}
