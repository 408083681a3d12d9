use overflow_repository::RepositoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Missing, unknown or expired session")]
    Unauthenticated,
    #[error("Session expiry is out of range")]
    ExpiryOutOfRange,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
