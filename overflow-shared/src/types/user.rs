use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{UserId, VotableId, VoteState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub is_moderator: bool,
    pub created_at: DateTime<Utc>,
}

/// A user together with the entities they have voted on.
///
/// An entity id appears in at most one of `upvoted` and `downvoted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub upvoted: BTreeSet<VotableId>,
    pub downvoted: BTreeSet<VotableId>,
}

impl UserProfile {
    pub fn vote_state(&self, id: &VotableId) -> VoteState {
        if self.upvoted.contains(id) {
            VoteState::Up
        } else if self.downvoted.contains(id) {
            VoteState::Down
        } else {
            VoteState::Unvoted
        }
    }
}

/// A stored bearer session. Only the hash of the token is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token_hash: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
