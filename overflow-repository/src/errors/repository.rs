//! Error types for the repositories.
//! Defines specific errors that can occur while reading or writing votable
//! content, users, sessions and votes.
use overflow_shared::types::{ConversionError, VotableId, VotableKind};
use thiserror::Error;

/// Represents errors that can occur within the repositories.
///
/// This enum consolidates store failures (SQLx errors, migration errors) and
/// the domain-level conditions a store detects, such as missing records.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid stored value: {0}")]
    InvalidStoredValue(#[from] ConversionError),

    #[error("{kind} {id} not found")]
    NotFound { kind: VotableKind, id: VotableId },

    #[error("Comments cannot be attached to a {0}")]
    InvalidCommentParent(VotableKind),

    #[error("{0}s are not moderated")]
    NotModerated(VotableKind),

    #[error("Username already taken: {0}")]
    UsernameTaken(String),
}

impl RepositoryError {
    pub fn not_found(kind: VotableKind, id: VotableId) -> Self {
        Self::NotFound { kind, id }
    }
}
