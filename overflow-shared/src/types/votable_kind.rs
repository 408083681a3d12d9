use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::ConversionError;

/// The three kinds of content that carry a vote count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VotableKind {
    Question,
    Answer,
    Comment,
}

impl VotableKind {
    pub const ALL: [VotableKind; 3] = [
        VotableKind::Question,
        VotableKind::Answer,
        VotableKind::Comment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VotableKind::Question => "question",
            VotableKind::Answer => "answer",
            VotableKind::Comment => "comment",
        }
    }

    /// Plural path segment used by the HTTP API (`/questions/{id}`).
    pub fn collection(&self) -> &'static str {
        match self {
            VotableKind::Question => "questions",
            VotableKind::Answer => "answers",
            VotableKind::Comment => "comments",
        }
    }

    pub fn from_collection(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.collection() == segment)
    }

    /// Questions and answers go through moderation; comments do not.
    pub fn is_moderated(&self) -> bool {
        !matches!(self, VotableKind::Comment)
    }
}

impl fmt::Display for VotableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<VotableKind> for i16 {
    fn from(kind: VotableKind) -> Self {
        match kind {
            VotableKind::Question => 0,
            VotableKind::Answer => 1,
            VotableKind::Comment => 2,
        }
    }
}

impl TryFrom<i16> for VotableKind {
    type Error = ConversionError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(VotableKind::Question),
            1 => Ok(VotableKind::Answer),
            2 => Ok(VotableKind::Comment),
            other => Err(ConversionError::InvalidVotableKind(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_segments_resolve_back_to_kind() {
        for kind in VotableKind::ALL {
            assert_eq!(VotableKind::from_collection(kind.collection()), Some(kind));
        }
        assert_eq!(VotableKind::from_collection("users"), None);
    }

    #[test]
    fn test_stored_discriminant_rejects_unknown_values() {
        assert_eq!(VotableKind::try_from(1), Ok(VotableKind::Answer));
        assert_eq!(
            VotableKind::try_from(7),
            Err(ConversionError::InvalidVotableKind(7))
        );
    }

    #[test]
    fn test_only_comments_skip_moderation() {
        assert!(VotableKind::Question.is_moderated());
        assert!(VotableKind::Answer.is_moderated());
        assert!(!VotableKind::Comment.is_moderated());
    }
}
