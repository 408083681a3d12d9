use std::sync::Arc;

use async_trait::async_trait;
use overflow_shared::types::{Transition, UserId, VotableId, VotableKind, VoteState};

use super::InMemoryStore;
use crate::errors::RepositoryError;
use crate::interfaces::{CommitOutcome, VoteTarget};

/// In-memory `VoteTarget` for one votable kind.
///
/// A commit holds the store's write lock for both the membership and the count
/// change, so they are observed together.
#[derive(Clone)]
pub struct InMemoryVoteTarget {
    store: Arc<InMemoryStore>,
    kind: VotableKind,
}

impl InMemoryVoteTarget {
    pub fn new(store: Arc<InMemoryStore>, kind: VotableKind) -> Self {
        Self { store, kind }
    }
}

#[async_trait]
impl VoteTarget for InMemoryVoteTarget {
    fn kind(&self) -> VotableKind {
        self.kind
    }

    async fn vote_count(&self, id: VotableId) -> Result<Option<i64>, RepositoryError> {
        Ok(self.store.state.read().await.vote_count(self.kind, &id))
    }

    async fn user_vote_state(
        &self,
        user_id: UserId,
        id: VotableId,
    ) -> Result<VoteState, RepositoryError> {
        let state = self.store.state.read().await;
        let direction = state.votes.get(&(user_id, self.kind, id)).copied();
        Ok(VoteState::from(direction))
    }

    async fn commit_transition(
        &self,
        user_id: UserId,
        id: VotableId,
        transition: Transition,
    ) -> Result<CommitOutcome, RepositoryError> {
        let mut state = self.store.state.write().await;
        if !state.contains(self.kind, &id) {
            return Err(RepositoryError::not_found(self.kind, id));
        }

        let key = (user_id, self.kind, id);
        let stored = VoteState::from(state.votes.get(&key).copied());
        if stored != transition.from {
            return Ok(CommitOutcome::Stale);
        }

        match transition.to.direction() {
            Some(direction) => state.votes.insert(key, direction),
            None => state.votes.remove(&key),
        };

        let count = state
            .vote_count_mut(self.kind, &id)
            .ok_or_else(|| RepositoryError::not_found(self.kind, id))?;
        *count += transition.delta();
        Ok(CommitOutcome::Applied { vote_count: *count })
    }
}
