use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("problem set not found: {0}")]
    ProblemSetNotFound(Uuid),

    #[error("problem not found: {0}")]
    ProblemNotFound(Uuid),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl DbError {
    /// Whether this error refers to a missing entity, as opposed to bad
    /// input or a storage failure. Callers map this to a 404-style signal.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DbError::ProblemSetNotFound(_) | DbError::ProblemNotFound(_) | DbError::UserNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
