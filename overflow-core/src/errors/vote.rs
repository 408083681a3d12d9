//! Error types for the vote service.
use overflow_repository::RepositoryError;
use overflow_shared::types::{VotableId, VotableKind};
use thiserror::Error;

/// Represents errors that can occur while applying a vote.
///
/// A transition that does not match the recorded state is not an error; it is
/// reported through `VoteOutcome::applied`.
#[derive(Debug, Error)]
pub enum VoteError {
    #[error("No vote target registered for {0}")]
    UnregisteredKind(VotableKind),
    #[error("{kind} {id} not found")]
    NotFound { kind: VotableKind, id: VotableId },
    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for VoteError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound { kind, id } => VoteError::NotFound { kind, id },
            other => VoteError::Repository(other),
        }
    }
}
