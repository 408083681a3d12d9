//! PostgreSQL implementation of the session repository.
//!
//! Stores hashed bearer tokens in a `sessions` table.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use overflow_shared::types::Session;
use uuid::Uuid;

use crate::errors::RepositoryError;
use crate::interfaces::SessionRepository;

/// PostgreSQL-backed session repository.
pub struct PostgresSessionRepository {
    /// PostgreSQL connection pool
    pool: sqlx::PgPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn save_session(&self, session: &Session) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (token_hash, user_id, expires_at) VALUES ($1, $2, $3)
            ON CONFLICT (token_hash) DO UPDATE SET user_id = $2, expires_at = $3
            "#,
        )
        .bind(&session.token_hash)
        .bind(session.user_id)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_session(&self, token_hash: &str) -> Result<Option<Session>, RepositoryError> {
        let row = sqlx::query_as::<_, (String, Uuid, DateTime<Utc>)>(
            "SELECT token_hash, user_id, expires_at FROM sessions WHERE token_hash = $1",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(token_hash, user_id, expires_at)| Session {
            token_hash,
            user_id,
            expires_at,
        }))
    }

    async fn delete_session(&self, token_hash: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
