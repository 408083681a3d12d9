//! This module defines and re-exports the interfaces for the repositories.
//! It serves as a central point for accessing traits related to data interaction.
mod content;
mod session;
mod user;
mod vote_target;

pub use content::ContentRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
pub use vote_target::{CommitOutcome, VoteTarget};
