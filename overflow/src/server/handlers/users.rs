use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use overflow_core::auth::IssuedToken;
use overflow_shared::types::{User, UserProfile};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::server::error::ApiError;
use crate::server::extract::{ApiJson, AuthUser, BearerToken};
use crate::server::state::AppState;

const MAX_USERNAME_LEN: usize = 32;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<IssuedToken> for TokenResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            expires_at: issued.expires_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user: User,
    #[serde(flatten)]
    pub token: TokenResponse,
}

fn validate_username(username: &str) -> Result<String, ApiError> {
    let username = username.trim();
    if username.is_empty() || username.chars().count() > MAX_USERNAME_LEN {
        return Err(ApiError::BadRequest(format!(
            "username must be between 1 and {MAX_USERNAME_LEN} characters"
        )));
    }
    if username.chars().any(char::is_whitespace) {
        return Err(ApiError::BadRequest("username must not contain whitespace".to_string()));
    }
    Ok(username.to_string())
}

/// Registers a user and opens their first session.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let username = validate_username(&request.username)?;
    let is_moderator = state.moderator_usernames.contains(&username);
    let user = state.users.create_user(&username, is_moderator).await?;
    let issued = state.sessions.issue(user.id).await?;

    info!(user_id = %user.id, %username, is_moderator, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user,
            token: issued.into(),
        }),
    ))
}

pub async fn refresh_session(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<TokenResponse>, ApiError> {
    let issued = state.sessions.refresh(&token).await?;
    Ok(Json(issued.into()))
}

pub async fn current_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserProfile>, ApiError> {
    // A session can outlive its user only if the user row was removed.
    let profile = state
        .users
        .get_profile(user_id)
        .await?
        .ok_or(ApiError::Unauthenticated)?;
    Ok(Json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert_eq!(validate_username("  alice ").unwrap(), "alice");
        assert!(validate_username("").is_err());
        assert!(validate_username("two words").is_err());
        assert!(validate_username(&"x".repeat(MAX_USERNAME_LEN + 1)).is_err());
    }
}
