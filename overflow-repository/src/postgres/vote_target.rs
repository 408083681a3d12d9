use async_trait::async_trait;
use overflow_shared::types::{Direction, Transition, UserId, VotableId, VotableKind, VoteState};

use crate::errors::RepositoryError;
use crate::interfaces::{CommitOutcome, VoteTarget};
use crate::postgres::table_for;

/// PostgreSQL implementation of `VoteTarget` for one votable kind.
///
/// The kind selects the content table whose `vote_count` is adjusted; the vote
/// relation for all kinds lives in `user_votes`.
///
/// ## Features
///
/// - Membership and count changes share one transaction
/// - Membership writes are conditional on the prior state, so concurrent
///   requests for the same (user, entity) cannot both apply
/// - Counts are adjusted in place with `vote_count = vote_count + $delta`
#[derive(Clone)]
pub struct PostgresVoteTarget {
    pool: sqlx::PgPool,
    kind: VotableKind,
}

impl PostgresVoteTarget {
    pub fn new(pool: sqlx::PgPool, kind: VotableKind) -> Self {
        Self { pool, kind }
    }

    /// Creates one target per votable kind, sharing the pool.
    pub fn for_all_kinds(pool: &sqlx::PgPool) -> Vec<Self> {
        VotableKind::ALL
            .into_iter()
            .map(|kind| Self::new(pool.clone(), kind))
            .collect()
    }

    /// Applies the membership half of a transition within an active transaction.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The stored vote matched `transition.from` and was updated
    /// * `Ok(false)` - The stored vote had already changed; nothing was written
    async fn update_membership_tx(
        &self,
        user_id: UserId,
        id: VotableId,
        transition: Transition,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<bool, RepositoryError> {
        let kind = i16::from(self.kind);
        let result = match (transition.from.direction(), transition.to.direction()) {
            (None, Some(to)) => {
                sqlx::query(
                    r#"
                    INSERT INTO user_votes (user_id, votable_kind, votable_id, direction)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (user_id, votable_kind, votable_id) DO NOTHING
                    "#,
                )
                .bind(user_id)
                .bind(kind)
                .bind(id)
                .bind(i16::from(to))
                .execute(&mut **tx)
                .await?
            }
            (Some(from), None) => {
                sqlx::query(
                    r#"
                    DELETE FROM user_votes
                    WHERE user_id = $1 AND votable_kind = $2 AND votable_id = $3 AND direction = $4
                    "#,
                )
                .bind(user_id)
                .bind(kind)
                .bind(id)
                .bind(i16::from(from))
                .execute(&mut **tx)
                .await?
            }
            (Some(from), Some(to)) => {
                sqlx::query(
                    r#"
                    UPDATE user_votes
                    SET direction = $5, voted_at = now()
                    WHERE user_id = $1 AND votable_kind = $2 AND votable_id = $3 AND direction = $4
                    "#,
                )
                .bind(user_id)
                .bind(kind)
                .bind(id)
                .bind(i16::from(from))
                .bind(i16::from(to))
                .execute(&mut **tx)
                .await?
            }
            (None, None) => return Ok(true),
        };

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl VoteTarget for PostgresVoteTarget {
    fn kind(&self) -> VotableKind {
        self.kind
    }

    async fn vote_count(&self, id: VotableId) -> Result<Option<i64>, RepositoryError> {
        let query = format!("SELECT vote_count FROM {} WHERE id = $1", table_for(self.kind));
        let count = sqlx::query_scalar::<_, i64>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(count)
    }

    async fn user_vote_state(
        &self,
        user_id: UserId,
        id: VotableId,
    ) -> Result<VoteState, RepositoryError> {
        let direction = sqlx::query_scalar::<_, i16>(
            r#"
            SELECT direction FROM user_votes
            WHERE user_id = $1 AND votable_kind = $2 AND votable_id = $3
            "#,
        )
        .bind(user_id)
        .bind(i16::from(self.kind))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let direction = direction.map(Direction::try_from).transpose()?;
        Ok(VoteState::from(direction))
    }

    /// Commits a transition in a single transaction.
    ///
    /// The membership row is written first and acts as the guard. If the entity
    /// is missing the transaction is dropped, rolling the membership change back.
    async fn commit_transition(
        &self,
        user_id: UserId,
        id: VotableId,
        transition: Transition,
    ) -> Result<CommitOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if !self.update_membership_tx(user_id, id, transition, &mut tx).await? {
            tx.rollback().await?;
            return Ok(CommitOutcome::Stale);
        }

        let query = format!(
            "UPDATE {} SET vote_count = vote_count + $1 WHERE id = $2 RETURNING vote_count",
            table_for(self.kind)
        );
        let vote_count = sqlx::query_scalar::<_, i64>(&query)
            .bind(transition.delta())
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        match vote_count {
            Some(vote_count) => {
                tx.commit().await?;
                Ok(CommitOutcome::Applied { vote_count })
            }
            None => {
                tx.rollback().await?;
                Err(RepositoryError::not_found(self.kind, id))
            }
        }
    }
}
