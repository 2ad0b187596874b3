//! Repository Module
//!
//! CRUD operations over the SQLite tables. Repositories are free async
//! functions taking the shared pool; handlers translate [`RepoError`]
//! into HTTP responses via `AppError`.

pub mod photo;
pub mod score;
pub mod tag;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepoError::NotFound("row not found".to_string()),
            other => RepoError::Database(other.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
