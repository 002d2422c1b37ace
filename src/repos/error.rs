/**
 * Responsibility
 * - repo が上位に伝える意味の定義
 * - 「存在しない」と「他人の note」は NotFound 一つにまとめる
 */
use thiserror::Error;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, Error)]
pub enum RepoError {
    // Covers both a missing id and an id owned by someone else.
    #[error("not found")]
    NotFound,
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("migration error")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}
