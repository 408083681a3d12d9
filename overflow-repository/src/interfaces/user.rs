use overflow_shared::types::{User, UserId, UserProfile};

use crate::errors::RepositoryError;

/// Persistence for users and their derived vote sets.
#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `UsernameTaken` if the username is already registered.
    async fn create_user(&self, username: &str, is_moderator: bool)
    -> Result<User, RepositoryError>;

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Returns the user with their `upvoted` / `downvoted` sets.
    async fn get_profile(&self, id: UserId) -> Result<Option<UserProfile>, RepositoryError>;
}
