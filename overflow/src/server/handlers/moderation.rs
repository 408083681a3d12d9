use axum::Json;
use axum::extract::{Path, State};
use overflow_shared::types::{ModerationDecision, ModerationStatus, VotableId, VotableKind};
use serde::{Deserialize, Serialize};

use crate::server::error::ApiError;
use crate::server::extract::{ApiJson, AuthUser};
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ModerationRequest {
    pub decision: ModerationDecision,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModerationResponse {
    pub status: ModerationStatus,
}

pub async fn moderate_question(
    State(state): State<AppState>,
    AuthUser(moderator_id): AuthUser,
    Path(id): Path<VotableId>,
    ApiJson(request): ApiJson<ModerationRequest>,
) -> Result<Json<ModerationResponse>, ApiError> {
    let status = state
        .moderation
        .moderate(moderator_id, VotableKind::Question, id, request.decision)
        .await?;
    Ok(Json(ModerationResponse { status }))
}

pub async fn moderate_answer(
    State(state): State<AppState>,
    AuthUser(moderator_id): AuthUser,
    Path(id): Path<VotableId>,
    ApiJson(request): ApiJson<ModerationRequest>,
) -> Result<Json<ModerationResponse>, ApiError> {
    let status = state
        .moderation
        .moderate(moderator_id, VotableKind::Answer, id, request.decision)
        .await?;
    Ok(Json(ModerationResponse { status }))
}
