//! Error type returned by the HTTP handlers.
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use overflow_core::errors::{ModerationError, SessionError, VoteError};
use overflow_repository::RepositoryError;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Internal(message) = &self {
            error!(error = %message, "Request failed");
        }
        let message = match &self {
            ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        (
            status,
            Json(serde_json::json!({
                "status": "error",
                "message": message,
            })),
        )
            .into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound { .. } => ApiError::NotFound(error.to_string()),
            RepositoryError::InvalidCommentParent(_) | RepositoryError::NotModerated(_) => {
                ApiError::BadRequest(error.to_string())
            }
            RepositoryError::UsernameTaken(_) => ApiError::Conflict(error.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<VoteError> for ApiError {
    fn from(error: VoteError) -> Self {
        match error {
            VoteError::NotFound { .. } => ApiError::NotFound(error.to_string()),
            VoteError::UnregisteredKind(_) => ApiError::Internal(error.to_string()),
            VoteError::Repository(inner) => inner.into(),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::Unauthenticated => ApiError::Unauthenticated,
            SessionError::ExpiryOutOfRange => ApiError::Internal(error.to_string()),
            SessionError::Repository(inner) => inner.into(),
        }
    }
}

impl From<ModerationError> for ApiError {
    fn from(error: ModerationError) -> Self {
        match error {
            ModerationError::Forbidden => ApiError::Forbidden(error.to_string()),
            ModerationError::NotModerated(_) => ApiError::BadRequest(error.to_string()),
            ModerationError::NotFound { .. } => ApiError::NotFound(error.to_string()),
            ModerationError::Repository(inner) => inner.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overflow_shared::types::VotableKind;
    use uuid::Uuid;

    #[test]
    fn test_status_mapping() {
        let id = Uuid::new_v4();
        assert_eq!(
            ApiError::from(VoteError::NotFound {
                kind: VotableKind::Answer,
                id,
            })
            .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(SessionError::Unauthenticated).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(ModerationError::Forbidden).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(ModerationError::NotModerated(VotableKind::Comment)).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(RepositoryError::UsernameTaken("alice".to_string())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(RepositoryError::DatabaseError(sqlx::Error::PoolTimedOut)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_are_not_exposed() {
        let response = ApiError::Internal("connection refused".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
