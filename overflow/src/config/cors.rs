use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;

use crate::errors::ServerError;

/// Create the CORS layer for the configured front-end origins.
pub fn create_cors_layer(origins: &[String]) -> Result<CorsLayer, ServerError> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin.parse::<HeaderValue>().map_err(|_| ServerError::InvalidEnv {
                name: "CORS_ORIGINS",
                value: origin.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}
