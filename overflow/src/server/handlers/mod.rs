// HTTP request handlers
pub mod content;
pub mod moderation;
pub mod users;
pub mod votes;

use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "overflow is running")
}
