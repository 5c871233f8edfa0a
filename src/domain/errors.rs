use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),
    #[error("{0}")]
    InvalidCredentials(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
