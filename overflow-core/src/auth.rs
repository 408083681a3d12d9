//! Bearer session issuing, resolution and refresh.
//!
//! Tokens are 32 random bytes, hex encoded. Only their SHA-256 hash is stored.
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use overflow_repository::SessionRepository;
use overflow_shared::types::{Session, UserId};
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::errors::SessionError;

const TOKEN_BYTES: usize = 32;

/// A freshly issued bearer token. The plaintext is only available here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

/// Issues and resolves bearer sessions against a `SessionRepository`.
#[derive(Clone)]
pub struct SessionIssuer {
    sessions: Arc<dyn SessionRepository>,
    ttl: Duration,
}

impl SessionIssuer {
    pub fn new(sessions: Arc<dyn SessionRepository>, ttl: Duration) -> Self {
        Self { sessions, ttl }
    }

    pub async fn issue(&self, user_id: UserId) -> Result<IssuedToken, SessionError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or(SessionError::ExpiryOutOfRange)?;

        let swept = self.sessions.delete_expired_sessions(now).await?;
        if swept > 0 {
            debug!(swept, "Expired sessions removed");
        }

        let token = generate_token();
        self.sessions
            .save_session(&Session {
                token_hash: hash_token(&token),
                user_id,
                expires_at,
            })
            .await?;

        debug!(%user_id, %expires_at, "Session issued");
        Ok(IssuedToken {
            token,
            user_id,
            expires_at,
        })
    }

    /// Returns the user a live token belongs to. Expired sessions are removed.
    pub async fn resolve(&self, token: &str) -> Result<UserId, SessionError> {
        let token_hash = hash_token(token);
        let session = self
            .sessions
            .find_session(&token_hash)
            .await?
            .ok_or(SessionError::Unauthenticated)?;

        if session.is_expired_at(Utc::now()) {
            self.sessions.delete_session(&token_hash).await?;
            return Err(SessionError::Unauthenticated);
        }

        Ok(session.user_id)
    }

    /// Revokes the presented token and issues a new one for the same user.
    pub async fn refresh(&self, token: &str) -> Result<IssuedToken, SessionError> {
        let user_id = self.resolve(token).await?;
        self.sessions.delete_session(&hash_token(token)).await?;
        self.issue(user_id).await
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use overflow_repository::InMemoryStore;
    use uuid::Uuid;

    fn issuer(ttl: Duration) -> (Arc<InMemoryStore>, SessionIssuer) {
        let store = Arc::new(InMemoryStore::new());
        let issuer = SessionIssuer::new(store.clone(), ttl);
        (store, issuer)
    }

    #[tokio::test]
    async fn test_issue_and_resolve() {
        let (store, issuer) = issuer(Duration::hours(1));
        let user_id = Uuid::new_v4();

        let issued = issuer.issue(user_id).await.unwrap();
        assert_eq!(issued.token.len(), TOKEN_BYTES * 2);
        assert_eq!(issuer.resolve(&issued.token).await.unwrap(), user_id);

        // Only the hash is persisted.
        assert!(store.find_session(&issued.token).await.unwrap().is_none());
        assert!(store.find_session(&hash_token(&issued.token)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_unknown_token_is_unauthenticated() {
        let (_, issuer) = issuer(Duration::hours(1));
        let result = issuer.resolve("not-a-token").await;
        assert!(matches!(result, Err(SessionError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected_and_removed() {
        let (store, issuer) = issuer(Duration::seconds(-1));
        let issued = issuer.issue(Uuid::new_v4()).await.unwrap();

        let result = issuer.resolve(&issued.token).await;
        assert!(matches!(result, Err(SessionError::Unauthenticated)));
        assert!(store.find_session(&hash_token(&issued.token)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_refresh_rotates_token() {
        let (_, issuer) = issuer(Duration::hours(1));
        let user_id = Uuid::new_v4();
        let first = issuer.issue(user_id).await.unwrap();

        let second = issuer.refresh(&first.token).await.unwrap();
        assert_ne!(first.token, second.token);
        assert_eq!(issuer.resolve(&second.token).await.unwrap(), user_id);
        assert!(matches!(
            issuer.resolve(&first.token).await,
            Err(SessionError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_issue_with_unrepresentable_expiry_fails() {
        let (store, issuer) = issuer(Duration::MAX);
        let result = issuer.issue(Uuid::new_v4()).await;
        assert!(matches!(result, Err(SessionError::ExpiryOutOfRange)));
        assert_eq!(store.delete_expired_sessions(Utc::now()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_issue_sweeps_expired_sessions() {
        let (store, issuer) = issuer(Duration::hours(1));
        let stale = Session {
            token_hash: hash_token("abandoned"),
            user_id: Uuid::new_v4(),
            expires_at: Utc::now() - Duration::minutes(1),
        };
        store.save_session(&stale).await.unwrap();

        let issued = issuer.issue(Uuid::new_v4()).await.unwrap();
        assert!(store.find_session(&stale.token_hash).await.unwrap().is_none());
        assert!(store.find_session(&hash_token(&issued.token)).await.unwrap().is_some());
    }
}
