// App state for the axum server
use std::collections::HashSet;
use std::sync::Arc;

use overflow_core::auth::SessionIssuer;
use overflow_core::moderation::ModerationService;
use overflow_core::votes::VoteService;
use overflow_repository::{ContentRepository, UserRepository};

#[derive(Clone)]
pub struct AppState {
    pub votes: Arc<VoteService>,
    pub sessions: SessionIssuer,
    pub moderation: ModerationService,
    pub content: Arc<dyn ContentRepository>,
    pub users: Arc<dyn UserRepository>,
    pub moderator_usernames: Arc<HashSet<String>>,
}
