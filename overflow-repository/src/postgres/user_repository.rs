use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use overflow_shared::types::{Direction, User, UserId, UserProfile};
use uuid::Uuid;

use crate::errors::RepositoryError;
use crate::interfaces::UserRepository;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    is_moderator: bool,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            is_moderator: row.is_moderator,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL implementation of `UserRepository`.
///
/// Profiles derive the `upvoted` / `downvoted` sets from `user_votes`.
pub struct PostgresUserRepository {
    pool: sqlx::PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_user(
        &self,
        username: &str,
        is_moderator: bool,
    ) -> Result<User, RepositoryError> {
        let result = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, is_moderator)
            VALUES ($1, $2, $3)
            RETURNING id, username, is_moderator, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(is_moderator)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(RepositoryError::UsernameTaken(username.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, is_moderator, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    async fn get_profile(&self, id: UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let Some(user) = self.get_user(id).await? else {
            return Ok(None);
        };

        let votes = sqlx::query_as::<_, (Uuid, i16)>(
            "SELECT votable_id, direction FROM user_votes WHERE user_id = $1",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let mut upvoted = BTreeSet::new();
        let mut downvoted = BTreeSet::new();
        for (votable_id, direction) in votes {
            match Direction::try_from(direction)? {
                Direction::Up => upvoted.insert(votable_id),
                Direction::Down => downvoted.insert(votable_id),
            };
        }

        Ok(Some(UserProfile {
            user,
            upvoted,
            downvoted,
        }))
    }
}
