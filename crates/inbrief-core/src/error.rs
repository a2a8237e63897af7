//! Domain-level error types.

use thiserror::Error;

use crate::ports::AuthError;

/// Domain errors - business logic failures.
///
/// The `Display` output may carry internal detail (upstream messages, ids);
/// the HTTP layer decides what reaches the client.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: String },

    #[error("Edit window expired for post {0}")]
    EditWindowExpired(uuid::Uuid),

    #[error("Upstream service timed out: {0}")]
    UpstreamTimeout(String),

    #[error("Upstream service failed: {0}")]
    UpstreamFailure(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Stored record is corrupt: {0}")]
    Corrupt(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        Self::Internal(err.to_string())
    }
}
