/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証ロジックは middleware/services 側の責務
 * - ここは「型（契約）」として固定化する
 */

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user_id` はトークンの `sub` (identity provider の principal id, 例: `auth0|123`)
/// - `kid` はログ相関用
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub user_id: String,
    pub kid: Option<String>,
}

impl AuthCtx {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            kid: None,
        }
    }

    pub fn with_kid(mut self, kid: Option<String>) -> Self {
        self.kid = kid;
        self
    }
}
