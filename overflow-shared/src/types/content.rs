use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ConversionError, UserId, VotableId, VotableKind};

/// Moderation state of a question or answer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ModerationStatus {
    pub fn approved(&self) -> bool {
        matches!(self, ModerationStatus::Approved)
    }
}

impl From<ModerationStatus> for i16 {
    fn from(status: ModerationStatus) -> Self {
        match status {
            ModerationStatus::Pending => 0,
            ModerationStatus::Approved => 1,
            ModerationStatus::Rejected => 2,
        }
    }
}

impl TryFrom<i16> for ModerationStatus {
    type Error = ConversionError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ModerationStatus::Pending),
            1 => Ok(ModerationStatus::Approved),
            2 => Ok(ModerationStatus::Rejected),
            other => Err(ConversionError::InvalidModerationStatus(other)),
        }
    }
}

/// A moderator's verdict on a submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationDecision {
    Approve,
    Reject,
}

impl ModerationDecision {
    pub fn status(&self) -> ModerationStatus {
        match self {
            ModerationDecision::Approve => ModerationStatus::Approved,
            ModerationDecision::Reject => ModerationStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: VotableId,
    pub author_id: UserId,
    pub title: String,
    pub text: String,
    pub tags: Vec<String>,
    pub vote_count: i64,
    pub moderation: ModerationStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub author_id: UserId,
    pub title: String,
    pub text: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub id: VotableId,
    pub question_id: VotableId,
    pub author_id: UserId,
    pub text: String,
    pub vote_count: i64,
    pub moderation: ModerationStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAnswer {
    pub question_id: VotableId,
    pub author_id: UserId,
    pub text: String,
}

/// The question or answer a comment is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentParent {
    pub kind: VotableKind,
    pub id: VotableId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: VotableId,
    pub parent: CommentParent,
    pub author_id: UserId,
    pub text: String,
    pub vote_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub parent: CommentParent,
    pub author_id: UserId,
    pub text: String,
}
