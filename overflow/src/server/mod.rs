// Server module - HTTP server setup and routing
pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;

use std::net::SocketAddr;

use axum::Router;
use axum::routing::{get, post};
use overflow_shared::types::VotableKind;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use self::handlers::{content, moderation, users, votes};
use self::state::AppState;
use crate::errors::ServerError;

/// Vote routes for one collection, e.g. `/questions/:id/votes/cast`.
fn vote_routes(kind: VotableKind) -> Router<AppState> {
    let base = format!("/{}/:id/votes", kind.collection());
    Router::new()
        .route(&format!("{base}/cast"), post(votes::cast_vote))
        .route(&format!("{base}/retract"), post(votes::retract_vote))
        .route(&format!("{base}/switch"), post(votes::switch_vote))
}

/// Create the axum application router with all routes and middleware
pub fn create_app(state: AppState, cors: CorsLayer) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/users", post(users::register))
        .route("/users/me", get(users::current_user))
        .route("/sessions/refresh", post(users::refresh_session))
        .route("/questions", post(content::create_question))
        .route("/questions/:id", get(content::get_question))
        .route("/questions/:id/answers", post(content::create_answer))
        .route("/questions/:id/comments", post(content::comment_on_question))
        .route("/questions/:id/moderation", post(moderation::moderate_question))
        .route("/answers/:id", get(content::get_answer))
        .route("/answers/:id/comments", post(content::comment_on_answer))
        .route("/answers/:id/moderation", post(moderation::moderate_answer))
        .route("/comments/:id", get(content::get_comment));

    for kind in VotableKind::ALL {
        router = router.merge(vote_routes(kind));
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server on the specified address until Ctrl-C is received.
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
