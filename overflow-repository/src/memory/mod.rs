//! In-memory implementation of the overflow repositories.
//!
//! All state lives in one `MemoryState` behind a `RwLock` and is lost on
//! restart. Used for local runs (`STORE=memory`) and tests.
mod vote_target;

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use overflow_shared::types::{
    Answer, Comment, Direction, ModerationStatus, NewAnswer, NewComment, NewQuestion, Question,
    Session, User, UserId, UserProfile, VotableId, VotableKind,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::RepositoryError;
use crate::interfaces::{ContentRepository, SessionRepository, UserRepository};

pub use vote_target::InMemoryVoteTarget;

#[derive(Default)]
struct MemoryState {
    users: HashMap<UserId, User>,
    sessions: HashMap<String, Session>,
    questions: HashMap<VotableId, Question>,
    answers: HashMap<VotableId, Answer>,
    comments: HashMap<VotableId, Comment>,
    /// The vote relation: one entry per (user, kind, entity).
    votes: HashMap<(UserId, VotableKind, VotableId), Direction>,
}

impl MemoryState {
    fn contains(&self, kind: VotableKind, id: &VotableId) -> bool {
        match kind {
            VotableKind::Question => self.questions.contains_key(id),
            VotableKind::Answer => self.answers.contains_key(id),
            VotableKind::Comment => self.comments.contains_key(id),
        }
    }

    fn vote_count(&self, kind: VotableKind, id: &VotableId) -> Option<i64> {
        match kind {
            VotableKind::Question => self.questions.get(id).map(|q| q.vote_count),
            VotableKind::Answer => self.answers.get(id).map(|a| a.vote_count),
            VotableKind::Comment => self.comments.get(id).map(|c| c.vote_count),
        }
    }

    fn vote_count_mut(&mut self, kind: VotableKind, id: &VotableId) -> Option<&mut i64> {
        match kind {
            VotableKind::Question => self.questions.get_mut(id).map(|q| &mut q.vote_count),
            VotableKind::Answer => self.answers.get_mut(id).map(|a| &mut a.vote_count),
            VotableKind::Comment => self.comments.get_mut(id).map(|c| &mut c.vote_count),
        }
    }
}

/// In-memory store implementing every overflow repository trait.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates one vote target per votable kind over this store.
    pub fn vote_targets(self: &Arc<Self>) -> Vec<InMemoryVoteTarget> {
        VotableKind::ALL
            .into_iter()
            .map(|kind| InMemoryVoteTarget::new(Arc::clone(self), kind))
            .collect()
    }

    /// Overwrites an entity's vote count without touching the vote relation.
    ///
    /// Seeds fixtures that start from an existing tally.
    pub async fn set_vote_count(
        &self,
        kind: VotableKind,
        id: VotableId,
        vote_count: i64,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        let count = state
            .vote_count_mut(kind, &id)
            .ok_or_else(|| RepositoryError::not_found(kind, id))?;
        *count = vote_count;
        Ok(())
    }
}

#[async_trait]
impl ContentRepository for InMemoryStore {
    async fn create_question(&self, question: &NewQuestion) -> Result<Question, RepositoryError> {
        let created = Question {
            id: Uuid::new_v4(),
            author_id: question.author_id,
            title: question.title.clone(),
            text: question.text.clone(),
            tags: question.tags.clone(),
            vote_count: 0,
            moderation: ModerationStatus::Pending,
            created_at: Utc::now(),
        };
        let mut state = self.state.write().await;
        state.questions.insert(created.id, created.clone());
        Ok(created)
    }

    async fn create_answer(&self, answer: &NewAnswer) -> Result<Answer, RepositoryError> {
        let mut state = self.state.write().await;
        if !state.questions.contains_key(&answer.question_id) {
            return Err(RepositoryError::not_found(VotableKind::Question, answer.question_id));
        }
        let created = Answer {
            id: Uuid::new_v4(),
            question_id: answer.question_id,
            author_id: answer.author_id,
            text: answer.text.clone(),
            vote_count: 0,
            moderation: ModerationStatus::Pending,
            created_at: Utc::now(),
        };
        state.answers.insert(created.id, created.clone());
        Ok(created)
    }

    async fn create_comment(&self, comment: &NewComment) -> Result<Comment, RepositoryError> {
        let parent = comment.parent;
        if parent.kind == VotableKind::Comment {
            return Err(RepositoryError::InvalidCommentParent(parent.kind));
        }
        let mut state = self.state.write().await;
        if !state.contains(parent.kind, &parent.id) {
            return Err(RepositoryError::not_found(parent.kind, parent.id));
        }
        let created = Comment {
            id: Uuid::new_v4(),
            parent,
            author_id: comment.author_id,
            text: comment.text.clone(),
            vote_count: 0,
            created_at: Utc::now(),
        };
        state.comments.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_question(&self, id: VotableId) -> Result<Option<Question>, RepositoryError> {
        Ok(self.state.read().await.questions.get(&id).cloned())
    }

    async fn get_answer(&self, id: VotableId) -> Result<Option<Answer>, RepositoryError> {
        Ok(self.state.read().await.answers.get(&id).cloned())
    }

    async fn get_comment(&self, id: VotableId) -> Result<Option<Comment>, RepositoryError> {
        Ok(self.state.read().await.comments.get(&id).cloned())
    }

    async fn set_moderation(
        &self,
        kind: VotableKind,
        id: VotableId,
        status: ModerationStatus,
    ) -> Result<ModerationStatus, RepositoryError> {
        let mut state = self.state.write().await;
        let moderation = match kind {
            VotableKind::Question => state.questions.get_mut(&id).map(|q| &mut q.moderation),
            VotableKind::Answer => state.answers.get_mut(&id).map(|a| &mut a.moderation),
            VotableKind::Comment => return Err(RepositoryError::NotModerated(kind)),
        };
        let moderation = moderation.ok_or_else(|| RepositoryError::not_found(kind, id))?;
        *moderation = status;
        Ok(status)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(
        &self,
        username: &str,
        is_moderator: bool,
    ) -> Result<User, RepositoryError> {
        let mut state = self.state.write().await;
        if state.users.values().any(|user| user.username == username) {
            return Err(RepositoryError::UsernameTaken(username.to_string()));
        }
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            is_moderator,
            created_at: Utc::now(),
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn get_profile(&self, id: UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let state = self.state.read().await;
        let Some(user) = state.users.get(&id).cloned() else {
            return Ok(None);
        };

        let mut upvoted = BTreeSet::new();
        let mut downvoted = BTreeSet::new();
        for ((user_id, _, votable_id), direction) in &state.votes {
            if *user_id != id {
                continue;
            }
            match direction {
                Direction::Up => upvoted.insert(*votable_id),
                Direction::Down => downvoted.insert(*votable_id),
            };
        }

        Ok(Some(UserProfile {
            user,
            upvoted,
            downvoted,
        }))
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn save_session(&self, session: &Session) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        state
            .sessions
            .insert(session.token_hash.clone(), session.clone());
        Ok(())
    }

    async fn find_session(&self, token_hash: &str) -> Result<Option<Session>, RepositoryError> {
        Ok(self.state.read().await.sessions.get(token_hash).cloned())
    }

    async fn delete_session(&self, token_hash: &str) -> Result<bool, RepositoryError> {
        Ok(self.state.write().await.sessions.remove(token_hash).is_some())
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let mut state = self.state.write().await;
        let before = state.sessions.len();
        state.sessions.retain(|_, session| !session.is_expired_at(now));
        Ok((before - state.sessions.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overflow_shared::types::CommentParent;

    async fn seed_question(store: &InMemoryStore) -> (User, Question) {
        let user = store.create_user("alice", false).await.unwrap();
        let question = store
            .create_question(&NewQuestion {
                author_id: user.id,
                title: "How do lifetimes work?".to_string(),
                text: "Borrow checker questions".to_string(),
                tags: vec!["rust".to_string()],
            })
            .await
            .unwrap();
        (user, question)
    }

    #[tokio::test]
    async fn test_created_content_starts_pending_with_zero_votes() {
        let store = InMemoryStore::new();
        let (user, question) = seed_question(&store).await;
        assert_eq!(question.vote_count, 0);
        assert_eq!(question.moderation, ModerationStatus::Pending);

        let answer = store
            .create_answer(&NewAnswer {
                question_id: question.id,
                author_id: user.id,
                text: "Use references".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(answer.vote_count, 0);
        assert!(!answer.moderation.approved());
    }

    #[tokio::test]
    async fn test_answer_requires_existing_question() {
        let store = InMemoryStore::new();
        let user = store.create_user("bob", false).await.unwrap();
        let missing = Uuid::new_v4();
        let result = store
            .create_answer(&NewAnswer {
                question_id: missing,
                author_id: user.id,
                text: "orphan".to_string(),
            })
            .await;
        assert!(matches!(
            result,
            Err(RepositoryError::NotFound { kind: VotableKind::Question, id }) if id == missing
        ));
    }

    #[tokio::test]
    async fn test_comment_parent_must_be_question_or_answer() {
        let store = InMemoryStore::new();
        let (user, question) = seed_question(&store).await;
        let comment = store
            .create_comment(&NewComment {
                parent: CommentParent {
                    kind: VotableKind::Question,
                    id: question.id,
                },
                author_id: user.id,
                text: "Nice question".to_string(),
            })
            .await
            .unwrap();

        let nested = store
            .create_comment(&NewComment {
                parent: CommentParent {
                    kind: VotableKind::Comment,
                    id: comment.id,
                },
                author_id: user.id,
                text: "Reply".to_string(),
            })
            .await;
        assert!(matches!(nested, Err(RepositoryError::InvalidCommentParent(VotableKind::Comment))));
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected() {
        let store = InMemoryStore::new();
        store.create_user("carol", false).await.unwrap();
        let result = store.create_user("carol", true).await;
        assert!(matches!(result, Err(RepositoryError::UsernameTaken(name)) if name == "carol"));
    }

    #[tokio::test]
    async fn test_comments_cannot_be_moderated() {
        let store = InMemoryStore::new();
        let result = store
            .set_moderation(VotableKind::Comment, Uuid::new_v4(), ModerationStatus::Approved)
            .await;
        assert!(matches!(result, Err(RepositoryError::NotModerated(VotableKind::Comment))));
    }

    #[tokio::test]
    async fn test_session_round_trip_and_delete() {
        let store = InMemoryStore::new();
        let user = store.create_user("dave", false).await.unwrap();
        let session = Session {
            token_hash: "abc".to_string(),
            user_id: user.id,
            expires_at: Utc::now(),
        };
        store.save_session(&session).await.unwrap();
        assert_eq!(store.find_session("abc").await.unwrap(), Some(session));
        assert!(store.delete_session("abc").await.unwrap());
        assert!(!store.delete_session("abc").await.unwrap());
        assert_eq!(store.find_session("abc").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_expired_sessions_keeps_live_ones() {
        let store = InMemoryStore::new();
        let user = store.create_user("erin", false).await.unwrap();
        let now = Utc::now();
        for (token_hash, expires_at) in [
            ("expired", now - chrono::Duration::minutes(5)),
            ("boundary", now),
            ("live", now + chrono::Duration::hours(1)),
        ] {
            store
                .save_session(&Session {
                    token_hash: token_hash.to_string(),
                    user_id: user.id,
                    expires_at,
                })
                .await
                .unwrap();
        }

        assert_eq!(store.delete_expired_sessions(now).await.unwrap(), 2);
        assert!(store.find_session("expired").await.unwrap().is_none());
        assert!(store.find_session("boundary").await.unwrap().is_none());
        assert!(store.find_session("live").await.unwrap().is_some());
    }
}
