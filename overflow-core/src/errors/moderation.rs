use overflow_repository::RepositoryError;
use overflow_shared::types::{VotableId, VotableKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("Only moderators can moderate content")]
    Forbidden,
    #[error("{0}s are not moderated")]
    NotModerated(VotableKind),
    #[error("{kind} {id} not found")]
    NotFound { kind: VotableKind, id: VotableId },
    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ModerationError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound { kind, id } => ModerationError::NotFound { kind, id },
            RepositoryError::NotModerated(kind) => ModerationError::NotModerated(kind),
            other => ModerationError::Repository(other),
        }
    }
}
