use chrono::{DateTime, Utc};
use overflow_shared::types::Session;

use crate::errors::RepositoryError;

/// Trait for interacting with the session repository.
///
/// Sessions are keyed by the hash of their bearer token.
#[async_trait::async_trait]
pub trait SessionRepository: Send + Sync {
    async fn save_session(&self, session: &Session) -> Result<(), RepositoryError>;
    async fn find_session(&self, token_hash: &str) -> Result<Option<Session>, RepositoryError>;
    /// Returns whether a session was removed.
    async fn delete_session(&self, token_hash: &str) -> Result<bool, RepositoryError>;
    /// Removes every session that expired at or before `now`. Returns how many were removed.
    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError>;
}
