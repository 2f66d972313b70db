//! UI serving routes
//!
//! The page shell loads with a spinner; `app.js` then fetches the rendered
//! cards once and swaps them in.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::api::consultations::load_or_empty;
use crate::dashboard;
use crate::AppState;

const INDEX_HTML: &str = include_str!("../ui/index.html");
const APP_JS: &str = include_str!("../ui/app.js");

/// GET /
pub async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /static/app.js
pub async fn serve_app_js() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/javascript")],
        APP_JS,
    )
        .into_response()
}

/// GET /dashboard/cards
///
/// HTML fragment with one card per consultation, newest first
pub async fn serve_cards(State(state): State<AppState>) -> Html<String> {
    let consultations = load_or_empty(&state).await;
    Html(dashboard::render_cards(&consultations))
}
