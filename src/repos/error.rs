/**
 * Responsibility
 * - todo_repo が上位 (handler / AppError) に伝える失敗の定義
 * - 「行が無い」は Option / bool で返すため、ここには含めない
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("todo store query failed: {0}")]
    Db(#[from] sqlx::Error),
}
