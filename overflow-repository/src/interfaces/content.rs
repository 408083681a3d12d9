//! This module defines the `ContentRepository` trait for questions, answers and comments.
use overflow_shared::types::{
    Answer, Comment, ModerationStatus, NewAnswer, NewComment, NewQuestion, Question, VotableId,
    VotableKind,
};

use crate::errors::RepositoryError;

/// Persistence for votable content.
///
/// Created records start with a vote count of zero and, for questions and
/// answers, a pending moderation status.
#[async_trait::async_trait]
pub trait ContentRepository: Send + Sync {
    async fn create_question(&self, question: &NewQuestion) -> Result<Question, RepositoryError>;

    /// Fails with `NotFound` if the question does not exist.
    async fn create_answer(&self, answer: &NewAnswer) -> Result<Answer, RepositoryError>;

    /// Fails with `InvalidCommentParent` if the parent is a comment and with
    /// `NotFound` if the parent does not exist.
    async fn create_comment(&self, comment: &NewComment) -> Result<Comment, RepositoryError>;

    async fn get_question(&self, id: VotableId) -> Result<Option<Question>, RepositoryError>;

    async fn get_answer(&self, id: VotableId) -> Result<Option<Answer>, RepositoryError>;

    async fn get_comment(&self, id: VotableId) -> Result<Option<Comment>, RepositoryError>;

    /// Records a moderation status and returns it.
    async fn set_moderation(
        &self,
        kind: VotableKind,
        id: VotableId,
        status: ModerationStatus,
    ) -> Result<ModerationStatus, RepositoryError>;
}
