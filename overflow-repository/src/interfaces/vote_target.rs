//! This module defines the `VoteTarget` trait, the persistence capability one
//! votable kind exposes to the vote state machine.
use overflow_shared::types::{Transition, UserId, VotableId, VotableKind, VoteState};

use crate::errors::RepositoryError;

/// Result of a guarded vote commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The membership change and the count adjustment were both applied.
    Applied { vote_count: i64 },
    /// The stored vote no longer matched `transition.from`; nothing was written.
    Stale,
}

/// A trait that defines the vote operations for a single votable kind.
///
/// There is one implementation per store, instantiated once per kind, so
/// questions, answers and comments share the same transition logic.
#[async_trait::async_trait]
pub trait VoteTarget: Send + Sync {
    /// The votable kind this target reads and writes.
    fn kind(&self) -> VotableKind;

    /// Returns the current vote count, or `None` if the entity does not exist.
    async fn vote_count(&self, id: VotableId) -> Result<Option<i64>, RepositoryError>;

    /// Returns the vote the user currently holds on the entity.
    async fn user_vote_state(
        &self,
        user_id: UserId,
        id: VotableId,
    ) -> Result<VoteState, RepositoryError>;

    /// Atomically applies a transition.
    ///
    /// The user's vote membership is updated first, conditional on it still being
    /// `transition.from`; that condition is the double-vote guard. The count is then
    /// adjusted by `transition.delta()` inside the store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the entity does not exist. No
    /// membership change is kept in that case.
    async fn commit_transition(
        &self,
        user_id: UserId,
        id: VotableId,
        transition: Transition,
    ) -> Result<CommitOutcome, RepositoryError>;
}
