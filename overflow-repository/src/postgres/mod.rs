//! PostgreSQL implementation of the overflow repositories.
//!
//! ## Database Tables
//!
//! - `users`, `sessions`: accounts and hashed bearer tokens
//! - `questions`, `answers`, `comments`: votable content with a denormalized `vote_count`
//! - `user_votes`: one row per (user, votable), the materialised vote relation
mod content_repository;
mod session_repository;
mod user_repository;
mod vote_target;

pub use content_repository::PostgresContentRepository;
pub use session_repository::PostgresSessionRepository;
pub use user_repository::PostgresUserRepository;
pub use vote_target::PostgresVoteTarget;

use crate::errors::RepositoryError;
use overflow_shared::types::VotableKind;

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<(), RepositoryError> {
    sqlx::migrate!("./src/postgres/migrations").run(pool).await?;
    Ok(())
}

/// Table holding the records of one votable kind.
pub(crate) fn table_for(kind: VotableKind) -> &'static str {
    match kind {
        VotableKind::Question => "questions",
        VotableKind::Answer => "answers",
        VotableKind::Comment => "comments",
    }
}
