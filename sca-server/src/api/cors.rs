//! CORS for the webhook endpoints
//!
//! Browsers send a real preflight (with `Access-Control-Request-Method`),
//! which `CorsLayer` answers itself. Bare `OPTIONS` probes from webhook
//! senders fall through to [`preflight`] and get the same headers.

use axum::http::{
    header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, AUTHORIZATION, CONTENT_TYPE},
    Method, StatusCode,
};
use axum::response::IntoResponse;
use tower_http::cors::{Any, CorsLayer};

const ALLOWED_METHODS: &str = "POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

/// Any origin, POST/OPTIONS, Content-Type/Authorization
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}

/// OPTIONS handler: CORS headers, empty body
pub async fn preflight() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS),
            (ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS),
        ],
    )
}
