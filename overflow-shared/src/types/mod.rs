mod content;
mod conversion;
mod ids;
mod user;
mod votable_kind;
mod vote;
mod vote_outcome;

pub use content::{
    Answer, Comment, CommentParent, ModerationDecision, ModerationStatus, NewAnswer, NewComment,
    NewQuestion, Question,
};
pub use conversion::ConversionError;
pub use ids::{UserId, VotableId};
pub use user::{Session, User, UserProfile};
pub use votable_kind::VotableKind;
pub use vote::{Direction, Transition, VoteIntent, VoteState};
pub use vote_outcome::VoteOutcome;
