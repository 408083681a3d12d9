use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use overflow_shared::types::{
    Answer, Comment, CommentParent, NewAnswer, NewComment, NewQuestion, Question, UserId, VotableId,
    VotableKind,
};
use serde::Deserialize;
use tracing::info;

use crate::server::error::ApiError;
use crate::server::extract::{ApiJson, AuthUser};
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

fn required(field: &str, value: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(value.to_string())
}

/// Trims tags, drops empty ones and keeps the first occurrence of each.
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    normalized
}

pub async fn create_question(
    State(state): State<AppState>,
    AuthUser(author_id): AuthUser,
    ApiJson(request): ApiJson<CreateQuestionRequest>,
) -> Result<(StatusCode, Json<Question>), ApiError> {
    let question = state
        .content
        .create_question(&NewQuestion {
            author_id,
            title: required("title", &request.title)?,
            text: required("text", &request.text)?,
            tags: normalize_tags(request.tags),
        })
        .await?;

    info!(id = %question.id, %author_id, "Question created");
    Ok((StatusCode::CREATED, Json(question)))
}

pub async fn create_answer(
    State(state): State<AppState>,
    AuthUser(author_id): AuthUser,
    Path(question_id): Path<VotableId>,
    ApiJson(request): ApiJson<TextRequest>,
) -> Result<(StatusCode, Json<Answer>), ApiError> {
    let answer = state
        .content
        .create_answer(&NewAnswer {
            question_id,
            author_id,
            text: required("text", &request.text)?,
        })
        .await?;

    info!(id = %answer.id, %question_id, %author_id, "Answer created");
    Ok((StatusCode::CREATED, Json(answer)))
}

pub async fn comment_on_question(
    State(state): State<AppState>,
    AuthUser(author_id): AuthUser,
    Path(id): Path<VotableId>,
    ApiJson(request): ApiJson<TextRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let parent = CommentParent {
        kind: VotableKind::Question,
        id,
    };
    create_comment(&state, author_id, parent, &request.text).await
}

pub async fn comment_on_answer(
    State(state): State<AppState>,
    AuthUser(author_id): AuthUser,
    Path(id): Path<VotableId>,
    ApiJson(request): ApiJson<TextRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let parent = CommentParent {
        kind: VotableKind::Answer,
        id,
    };
    create_comment(&state, author_id, parent, &request.text).await
}

async fn create_comment(
    state: &AppState,
    author_id: UserId,
    parent: CommentParent,
    text: &str,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let comment = state
        .content
        .create_comment(&NewComment {
            parent,
            author_id,
            text: required("text", text)?,
        })
        .await?;

    info!(id = %comment.id, parent_kind = %parent.kind, parent_id = %parent.id, "Comment created");
    Ok((StatusCode::CREATED, Json(comment)))
}

fn not_found(kind: VotableKind, id: VotableId) -> ApiError {
    ApiError::NotFound(format!("{kind} {id} not found"))
}

pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<VotableId>,
) -> Result<Json<Question>, ApiError> {
    let question = state.content.get_question(id).await?;
    question.map(Json).ok_or_else(|| not_found(VotableKind::Question, id))
}

pub async fn get_answer(
    State(state): State<AppState>,
    Path(id): Path<VotableId>,
) -> Result<Json<Answer>, ApiError> {
    let answer = state.content.get_answer(id).await?;
    answer.map(Json).ok_or_else(|| not_found(VotableKind::Answer, id))
}

pub async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<VotableId>,
) -> Result<Json<Comment>, ApiError> {
    let comment = state.content.get_comment(id).await?;
    comment.map(Json).ok_or_else(|| not_found(VotableKind::Comment, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tags() {
        let tags = vec![
            " Rust ".to_string(),
            "".to_string(),
            "async".to_string(),
            "rust".to_string(),
        ];
        assert_eq!(normalize_tags(tags), vec!["rust".to_string(), "async".to_string()]);
    }

    #[test]
    fn test_required_rejects_blank_input() {
        assert!(matches!(required("title", "   "), Err(ApiError::BadRequest(_))));
        assert_eq!(required("title", " Why? ").unwrap(), "Why?");
    }
}
