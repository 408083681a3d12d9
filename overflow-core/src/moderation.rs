use std::sync::Arc;

use overflow_repository::{ContentRepository, UserRepository};
use overflow_shared::types::{ModerationDecision, ModerationStatus, UserId, VotableId, VotableKind};
use tracing::info;

use crate::errors::ModerationError;

/// Applies moderator decisions to questions and answers.
///
/// Moderation only changes the submission's status; it never touches votes.
#[derive(Clone)]
pub struct ModerationService {
    users: Arc<dyn UserRepository>,
    content: Arc<dyn ContentRepository>,
}

impl ModerationService {
    pub fn new(users: Arc<dyn UserRepository>, content: Arc<dyn ContentRepository>) -> Self {
        Self { users, content }
    }

    pub async fn moderate(
        &self,
        moderator_id: UserId,
        kind: VotableKind,
        id: VotableId,
        decision: ModerationDecision,
    ) -> Result<ModerationStatus, ModerationError> {
        let is_moderator = self
            .users
            .get_user(moderator_id)
            .await?
            .is_some_and(|user| user.is_moderator);
        if !is_moderator {
            return Err(ModerationError::Forbidden);
        }
        if !kind.is_moderated() {
            return Err(ModerationError::NotModerated(kind));
        }

        let status = self.content.set_moderation(kind, id, decision.status()).await?;
        info!(%kind, %id, %moderator_id, ?status, "Moderation decision recorded");
        Ok(status)
    }
}
