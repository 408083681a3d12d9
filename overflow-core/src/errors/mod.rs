mod moderation;
mod session;
mod vote;

pub use moderation::ModerationError;
pub use session::SessionError;
pub use vote::VoteError;
