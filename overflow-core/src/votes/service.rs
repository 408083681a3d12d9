use std::collections::HashMap;
use std::sync::Arc;

use overflow_repository::{CommitOutcome, VoteTarget};
use overflow_shared::types::{
    Direction, UserId, VotableId, VotableKind, VoteIntent, VoteOutcome, VoteState,
};
use tracing::{debug, info, warn};

use crate::errors::VoteError;
use crate::votes::machine;

/// `VoteService` runs the vote state machine for every votable kind.
///
/// It manages a registry of `VoteTarget`s keyed by kind. The recorded state is
/// always re-derived from the target before a transition is planned; the
/// client's intent only says what the client believes that state to be.
#[derive(Default, Clone)]
pub struct VoteService {
    targets: HashMap<VotableKind, Arc<dyn VoteTarget>>,
}

impl VoteService {
    /// Creates a new `VoteService` with an empty target registry.
    pub fn new() -> Self {
        Self {
            targets: HashMap::new(),
        }
    }

    /// Registers the target for the kind it reports, replacing any previous one.
    pub fn register_target(&mut self, target: Arc<dyn VoteTarget>) {
        self.targets.insert(target.kind(), target);
    }

    pub fn is_registered(&self, kind: VotableKind) -> bool {
        self.targets.contains_key(&kind)
    }

    /// Records a first vote. `is_down` selects the direction.
    pub async fn cast(
        &self,
        kind: VotableKind,
        id: VotableId,
        user_id: UserId,
        is_down: bool,
    ) -> Result<VoteOutcome, VoteError> {
        let intent = VoteIntent::Cast(Direction::from_is_down(is_down));
        self.apply(kind, id, user_id, intent).await
    }

    /// Withdraws the user's vote. `was_up` names the vote being withdrawn.
    pub async fn retract(
        &self,
        kind: VotableKind,
        id: VotableId,
        user_id: UserId,
        was_up: bool,
    ) -> Result<VoteOutcome, VoteError> {
        let intent = VoteIntent::Retract(Direction::from_was_up(was_up));
        self.apply(kind, id, user_id, intent).await
    }

    /// Flips the user's vote to `to`.
    pub async fn switch_vote(
        &self,
        kind: VotableKind,
        id: VotableId,
        user_id: UserId,
        to: Direction,
    ) -> Result<VoteOutcome, VoteError> {
        self.apply(kind, id, user_id, VoteIntent::Switch(to)).await
    }

    /// Applies an intent for `user_id` on the entity.
    ///
    /// # Returns
    ///
    /// * `Ok(outcome)` with `applied == true` - The transition was committed
    /// * `Ok(outcome)` with `applied == false` - The recorded state did not allow the
    ///   intent; `outcome` carries the recorded state and count
    /// * `Err(VoteError)` - Unknown entity, unregistered kind or store failure
    pub async fn apply(
        &self,
        kind: VotableKind,
        id: VotableId,
        user_id: UserId,
        intent: VoteIntent,
    ) -> Result<VoteOutcome, VoteError> {
        let target = self
            .targets
            .get(&kind)
            .ok_or(VoteError::UnregisteredKind(kind))?;

        let current = match target.user_vote_state(user_id, id).await {
            Ok(state) => state,
            Err(e) => {
                // A wrong hint comes back from the guarded commit as Stale.
                warn!(error = %e, %kind, %id, "Vote state read failed, using client hint");
                intent.expected_state()
            }
        };

        let transition = match machine::plan(intent, current) {
            Ok(transition) => transition,
            Err(mismatch) => {
                debug!(
                    %kind,
                    %id,
                    %user_id,
                    %mismatch,
                    "Vote intent does not match recorded state"
                );
                return self.recorded_outcome(target.as_ref(), id, user_id).await;
            }
        };

        match target.commit_transition(user_id, id, transition).await? {
            CommitOutcome::Applied { vote_count } => {
                info!(
                    %kind,
                    %id,
                    %user_id,
                    intent = intent.name(),
                    delta = transition.delta(),
                    vote_count,
                    "Vote applied"
                );
                Ok(VoteOutcome {
                    kind,
                    id,
                    state: transition.to,
                    vote_count,
                    applied: true,
                })
            }
            CommitOutcome::Stale => {
                warn!(%kind, %id, %user_id, intent = intent.name(), "Vote changed concurrently");
                self.recorded_outcome(target.as_ref(), id, user_id).await
            }
        }
    }

    /// Reads the authoritative state and count for a rejected intent.
    async fn recorded_outcome(
        &self,
        target: &dyn VoteTarget,
        id: VotableId,
        user_id: UserId,
    ) -> Result<VoteOutcome, VoteError> {
        let kind = target.kind();
        let vote_count = target
            .vote_count(id)
            .await?
            .ok_or(VoteError::NotFound { kind, id })?;
        let state: VoteState = target.user_vote_state(user_id, id).await?;

        Ok(VoteOutcome {
            kind,
            id,
            state,
            vote_count,
            applied: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use overflow_repository::{
        ContentRepository, InMemoryStore, InMemoryVoteTarget, RepositoryError, UserRepository,
    };
    use overflow_shared::types::{
        CommentParent, ConversionError, NewAnswer, NewComment, NewQuestion, Transition, User,
    };
    use std::sync::atomic::{AtomicBool, Ordering};
    use uuid::Uuid;

    struct Fixture {
        store: Arc<InMemoryStore>,
        service: VoteService,
        user: User,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let mut service = VoteService::new();
        for target in store.vote_targets() {
            service.register_target(Arc::new(target));
        }
        let user = store.create_user("voter", false).await.unwrap();
        Fixture { store, service, user }
    }

    async fn question_with_count(f: &Fixture, count: i64) -> VotableId {
        let question = f
            .store
            .create_question(&NewQuestion {
                author_id: f.user.id,
                title: "Borrowing in closures".to_string(),
                text: "Why does this move?".to_string(),
                tags: vec!["closures".to_string()],
            })
            .await
            .unwrap();
        f.store
            .set_vote_count(VotableKind::Question, question.id, count)
            .await
            .unwrap();
        question.id
    }

    #[tokio::test]
    async fn test_question_up_down_up_from_66() {
        let f = fixture().await;
        let id = question_with_count(&f, 66).await;

        let up = f.service.cast(VotableKind::Question, id, f.user.id, false).await.unwrap();
        assert!(up.applied);
        assert_eq!(up.vote_count, 67);
        assert_eq!(up.state, VoteState::Up);

        let down = f
            .service
            .switch_vote(VotableKind::Question, id, f.user.id, Direction::Down)
            .await
            .unwrap();
        assert_eq!(down.vote_count, 65);
        assert_eq!(down.state, VoteState::Down);

        let up_again = f
            .service
            .switch_vote(VotableKind::Question, id, f.user.id, Direction::Up)
            .await
            .unwrap();
        assert_eq!(up_again.vote_count, 67);

        let profile = f.store.get_profile(f.user.id).await.unwrap().unwrap();
        assert!(profile.upvoted.contains(&id));
        assert!(!profile.downvoted.contains(&id));
    }

    #[tokio::test]
    async fn test_answer_from_49_and_comment_from_25() {
        let f = fixture().await;
        let question = question_with_count(&f, 0).await;
        let answer = f
            .store
            .create_answer(&NewAnswer {
                question_id: question,
                author_id: f.user.id,
                text: "Use move".to_string(),
            })
            .await
            .unwrap();
        f.store.set_vote_count(VotableKind::Answer, answer.id, 49).await.unwrap();
        let comment = f
            .store
            .create_comment(&NewComment {
                parent: CommentParent {
                    kind: VotableKind::Answer,
                    id: answer.id,
                },
                author_id: f.user.id,
                text: "Works".to_string(),
            })
            .await
            .unwrap();
        f.store.set_vote_count(VotableKind::Comment, comment.id, 25).await.unwrap();

        let answer_up = f
            .service
            .cast(VotableKind::Answer, answer.id, f.user.id, false)
            .await
            .unwrap();
        assert_eq!(answer_up.vote_count, 50);
        let answer_down = f
            .service
            .switch_vote(VotableKind::Answer, answer.id, f.user.id, Direction::Down)
            .await
            .unwrap();
        assert_eq!(answer_down.vote_count, 48);

        let comment_up = f
            .service
            .cast(VotableKind::Comment, comment.id, f.user.id, false)
            .await
            .unwrap();
        assert_eq!(comment_up.vote_count, 26);
        let comment_down = f
            .service
            .switch_vote(VotableKind::Comment, comment.id, f.user.id, Direction::Down)
            .await
            .unwrap();
        assert_eq!(comment_down.vote_count, 24);
    }

    #[tokio::test]
    async fn test_double_cast_returns_recorded_state() {
        let f = fixture().await;
        let id = question_with_count(&f, 5).await;

        f.service.cast(VotableKind::Question, id, f.user.id, false).await.unwrap();
        let second = f.service.cast(VotableKind::Question, id, f.user.id, false).await.unwrap();

        assert!(!second.applied);
        assert_eq!(second.vote_count, 6);
        assert_eq!(second.state, VoteState::Up);
    }

    #[tokio::test]
    async fn test_stale_retract_does_not_apply_client_delta() {
        let f = fixture().await;
        let id = question_with_count(&f, 3).await;
        f.service.cast(VotableKind::Question, id, f.user.id, true).await.unwrap();

        // Client believes it upvoted; the server recorded a downvote.
        let outcome = f.service.retract(VotableKind::Question, id, f.user.id, true).await.unwrap();
        assert!(!outcome.applied);
        assert_eq!(outcome.state, VoteState::Down);
        assert_eq!(outcome.vote_count, 2);
    }

    #[tokio::test]
    async fn test_votes_from_different_users_are_independent() {
        let f = fixture().await;
        let id = question_with_count(&f, 0).await;
        let other = f.store.create_user("other", false).await.unwrap();

        f.service.cast(VotableKind::Question, id, f.user.id, false).await.unwrap();
        let outcome = f.service.cast(VotableKind::Question, id, other.id, true).await.unwrap();

        assert!(outcome.applied);
        assert_eq!(outcome.vote_count, 0);
        let first = f.store.get_profile(f.user.id).await.unwrap().unwrap();
        let second = f.store.get_profile(other.id).await.unwrap().unwrap();
        assert_eq!(first.vote_state(&id), VoteState::Up);
        assert_eq!(second.vote_state(&id), VoteState::Down);
    }

    #[tokio::test]
    async fn test_unknown_entity_is_not_found() {
        let f = fixture().await;
        let missing = Uuid::new_v4();

        let cast = f.service.cast(VotableKind::Answer, missing, f.user.id, false).await;
        assert!(matches!(cast, Err(VoteError::NotFound { kind: VotableKind::Answer, .. })));

        let retract = f.service.retract(VotableKind::Answer, missing, f.user.id, true).await;
        assert!(matches!(retract, Err(VoteError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_unregistered_kind() {
        let service = VoteService::new();
        let result = service
            .cast(VotableKind::Comment, Uuid::new_v4(), Uuid::new_v4(), false)
            .await;
        assert!(matches!(result, Err(VoteError::UnregisteredKind(VotableKind::Comment))));
    }

    /// Fails the first state read, then delegates to the in-memory target.
    struct FlakyReadTarget {
        inner: InMemoryVoteTarget,
        failed: AtomicBool,
    }

    #[async_trait]
    impl VoteTarget for FlakyReadTarget {
        fn kind(&self) -> VotableKind {
            self.inner.kind()
        }

        async fn vote_count(&self, id: VotableId) -> Result<Option<i64>, RepositoryError> {
            self.inner.vote_count(id).await
        }

        async fn user_vote_state(
            &self,
            user_id: UserId,
            id: VotableId,
        ) -> Result<VoteState, RepositoryError> {
            if !self.failed.swap(true, Ordering::SeqCst) {
                return Err(RepositoryError::InvalidStoredValue(
                    ConversionError::InvalidDirection(9),
                ));
            }
            self.inner.user_vote_state(user_id, id).await
        }

        async fn commit_transition(
            &self,
            user_id: UserId,
            id: VotableId,
            transition: Transition,
        ) -> Result<CommitOutcome, RepositoryError> {
            self.inner.commit_transition(user_id, id, transition).await
        }
    }

    #[tokio::test]
    async fn test_failed_read_falls_back_to_client_hint() {
        let f = fixture().await;
        let id = question_with_count(&f, 10).await;
        let mut service = VoteService::new();
        service.register_target(Arc::new(FlakyReadTarget {
            inner: InMemoryVoteTarget::new(Arc::clone(&f.store), VotableKind::Question),
            failed: AtomicBool::new(false),
        }));

        let outcome = service.cast(VotableKind::Question, id, f.user.id, false).await.unwrap();
        assert!(outcome.applied);
        assert_eq!(outcome.vote_count, 11);
    }

    #[tokio::test]
    async fn test_failed_read_with_wrong_hint_is_guarded() {
        let f = fixture().await;
        let id = question_with_count(&f, 10).await;
        f.service.cast(VotableKind::Question, id, f.user.id, false).await.unwrap();

        let mut service = VoteService::new();
        service.register_target(Arc::new(FlakyReadTarget {
            inner: InMemoryVoteTarget::new(Arc::clone(&f.store), VotableKind::Question),
            failed: AtomicBool::new(false),
        }));

        // The hint says "no vote yet" but the guard sees the recorded upvote.
        let outcome = service.cast(VotableKind::Question, id, f.user.id, false).await.unwrap();
        assert!(!outcome.applied);
        assert_eq!(outcome.vote_count, 11);
        assert_eq!(outcome.state, VoteState::Up);
    }
}
