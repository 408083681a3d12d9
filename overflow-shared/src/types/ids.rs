use uuid::Uuid;

/// Identifier of a registered user.
pub type UserId = Uuid;

/// Identifier of a question, answer or comment.
///
/// Identifiers are UUIDs, so they are unique across the three votable kinds.
pub type VotableId = Uuid;
