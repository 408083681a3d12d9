use serde::{Deserialize, Serialize};

use crate::types::{VotableId, VotableKind, VoteState};

/// Result of a vote request, as recorded by the server.
///
/// When `applied` is false the requested transition did not match the stored
/// state; `state` and `vote_count` are then the authoritative values the client
/// should resynchronise to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOutcome {
    pub kind: VotableKind,
    pub id: VotableId,
    pub state: VoteState,
    pub vote_count: i64,
    pub applied: bool,
}
