/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - ex: db: PgPool, authorizer: TokenAuthorizer, attachments: S3Attachments
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::{attachments::S3Attachments, authorizer::TokenAuthorizer};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub authorizer: Arc<TokenAuthorizer>,
    pub attachments: Option<Arc<S3Attachments>>,
}

impl AppState {
    pub fn new(
        db: sqlx::PgPool,
        authorizer: Arc<TokenAuthorizer>,
        attachments: Option<Arc<S3Attachments>>,
    ) -> Self {
        Self {
            db,
            authorizer,
            attachments,
        }
    }
}
