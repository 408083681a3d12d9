use std::sync::Arc;

use overflow_core::auth::SessionIssuer;
use overflow_core::moderation::ModerationService;
use overflow_core::votes::VoteService;
use overflow_repository::{
    ContentRepository, InMemoryStore, PostgresContentRepository, PostgresSessionRepository,
    PostgresUserRepository, PostgresVoteTarget, SessionRepository, UserRepository, run_migrations,
};
use tracing::info;

use crate::config::{Settings, StoreKind};
use crate::errors::ServerError;
use crate::server::state::AppState;

/// `Dependencies` holds the wired application state for the server.
///
/// Every votable kind has a vote target registered, whichever store is used.
pub struct Dependencies {
    pub state: AppState,
}

impl Dependencies {
    /// Creates a new `Dependencies` instance for the configured store.
    ///
    /// # Returns
    ///
    /// A `Result` which is `Ok(Self)` on successful initialization or a
    /// `ServerError` if the database cannot be reached or migrated.
    pub async fn new(settings: &Settings) -> Result<Self, ServerError> {
        match settings.store {
            StoreKind::Postgres => Self::postgres(settings).await,
            StoreKind::Memory => Ok(Self::in_memory(settings)),
        }
    }

    pub async fn postgres(settings: &Settings) -> Result<Self, ServerError> {
        let database_url = settings
            .database_url
            .as_deref()
            .ok_or(ServerError::MissingEnv("DATABASE_URL"))?;
        let pool = sqlx::PgPool::connect(database_url).await?;

        if settings.run_migrations {
            run_migrations(&pool).await?;
            info!("Database migrations applied");
        }

        let mut votes = VoteService::new();
        for target in PostgresVoteTarget::for_all_kinds(&pool) {
            votes.register_target(Arc::new(target));
        }

        info!(store = "postgres", "Dependencies initialized");
        Ok(Self::assemble(
            settings,
            votes,
            Arc::new(PostgresContentRepository::new(pool.clone())),
            Arc::new(PostgresUserRepository::new(pool.clone())),
            Arc::new(PostgresSessionRepository::new(pool)),
        ))
    }

    /// Wires everything over a single `InMemoryStore`. State is lost on exit.
    pub fn in_memory(settings: &Settings) -> Self {
        Self::with_memory_store(settings, Arc::new(InMemoryStore::new()))
    }

    /// Wires everything over an existing store, so callers can seed it.
    pub fn with_memory_store(settings: &Settings, store: Arc<InMemoryStore>) -> Self {
        let mut votes = VoteService::new();
        for target in store.vote_targets() {
            votes.register_target(Arc::new(target));
        }

        info!(store = "memory", "Dependencies initialized");
        Self::assemble(settings, votes, store.clone(), store.clone(), store)
    }

    fn assemble(
        settings: &Settings,
        votes: VoteService,
        content: Arc<dyn ContentRepository>,
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            state: AppState {
                votes: Arc::new(votes),
                sessions: SessionIssuer::new(sessions, settings.session_ttl),
                moderation: ModerationService::new(users.clone(), content.clone()),
                content,
                users,
                moderator_usernames: Arc::new(settings.moderator_usernames.clone()),
            },
        }
    }
}
