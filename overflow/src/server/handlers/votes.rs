use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use overflow_shared::types::{Direction, UserId, UserProfile, VoteIntent, VoteOutcome};
use serde::{Deserialize, Serialize};

use crate::server::error::ApiError;
use crate::server::extract::{ApiJson, AuthUser, VotablePath};
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CastVoteRequest {
    #[serde(default)]
    pub down: bool,
}

#[derive(Debug, Deserialize)]
pub struct RetractVoteRequest {
    pub was_up: bool,
}

#[derive(Debug, Deserialize)]
pub struct SwitchVoteRequest {
    pub to: Direction,
}

/// The outcome of a vote request plus the voter's refreshed profile.
#[derive(Debug, Serialize, Deserialize)]
pub struct VoteResponse {
    #[serde(flatten)]
    pub outcome: VoteOutcome,
    pub profile: Option<UserProfile>,
}

pub async fn cast_vote(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    path: VotablePath,
    ApiJson(request): ApiJson<CastVoteRequest>,
) -> Result<(StatusCode, Json<VoteResponse>), ApiError> {
    let intent = VoteIntent::Cast(Direction::from_is_down(request.down));
    respond(&state, user_id, path, intent).await
}

pub async fn retract_vote(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    path: VotablePath,
    ApiJson(request): ApiJson<RetractVoteRequest>,
) -> Result<(StatusCode, Json<VoteResponse>), ApiError> {
    let intent = VoteIntent::Retract(Direction::from_was_up(request.was_up));
    respond(&state, user_id, path, intent).await
}

pub async fn switch_vote(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    path: VotablePath,
    ApiJson(request): ApiJson<SwitchVoteRequest>,
) -> Result<(StatusCode, Json<VoteResponse>), ApiError> {
    respond(&state, user_id, path, VoteIntent::Switch(request.to)).await
}

/// `200 OK` when the transition was applied, `409 Conflict` with the recorded
/// state otherwise.
async fn respond(
    state: &AppState,
    user_id: UserId,
    path: VotablePath,
    intent: VoteIntent,
) -> Result<(StatusCode, Json<VoteResponse>), ApiError> {
    let outcome = state.votes.apply(path.kind, path.id, user_id, intent).await?;
    let profile = state.users.get_profile(user_id).await?;

    let status = if outcome.applied {
        StatusCode::OK
    } else {
        StatusCode::CONFLICT
    };
    Ok((status, Json(VoteResponse { outcome, profile })))
}
