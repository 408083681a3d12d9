//! Request extractors for bearer credentials, votable paths and JSON bodies.
use axum::Json;
use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, MatchedPath, Path, Request};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use overflow_shared::types::{UserId, VotableId, VotableKind};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// The raw bearer token presented with the request.
pub struct BearerToken(pub String);

/// The authenticated user, resolved from a live session.
pub struct AuthUser(pub UserId);

/// A votable entity addressed as `/{collection}/{id}/...`.
///
/// The kind comes from the first segment of the route that matched.
#[derive(Debug, Clone, Copy)]
pub struct VotablePath {
    pub kind: VotableKind,
    pub id: VotableId,
}

/// A JSON request body whose rejections use the API error shape.
pub struct ApiJson<T>(pub T);

pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        bearer_token(&parts.headers)
            .map(|token| BearerToken(token.to_string()))
            .ok_or(ApiError::Unauthenticated)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        let user_id = state.sessions.resolve(&token).await?;
        Ok(AuthUser(user_id))
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for VotablePath {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let kind = parts
            .extensions
            .get::<MatchedPath>()
            .and_then(|path| path.as_str().trim_start_matches('/').split('/').next())
            .and_then(VotableKind::from_collection)
            .ok_or_else(|| ApiError::NotFound("Unknown votable collection".to_string()))?;

        let Path(id) = Path::<VotableId>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        Ok(VotablePath { kind, id })
    }
}

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(ApiJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc123")), Some("abc123"));
        assert_eq!(bearer_token(&headers("bearer abc123")), Some("abc123"));
        assert_eq!(bearer_token(&headers("Basic abc123")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("abc123")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
