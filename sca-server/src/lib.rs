//! sca-server library - Sales Consultation Analyzer service
//!
//! Hosts the email-intake webhook, the consultation-creation endpoint, the
//! dashboard, and public access to stored recordings.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use sca_common::config::BackendConfig;
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

pub mod api;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use services::{BlobStore, ConsultationForwarder, FsBlobStore, Scorer};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Recording storage
    pub blob_store: Arc<dyn BlobStore>,
    /// Directory served at the public storage prefix
    pub storage_root: PathBuf,
    /// Optional scorer run after each consultation is committed
    pub scorer: Option<Arc<dyn Scorer>>,
    /// Client for the intake → creation call
    pub forwarder: ConsultationForwarder,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Filesystem blob store under `storage_root`, no scorer beyond the placeholder
    pub fn new(db: SqlitePool, storage_root: PathBuf, backend: &BackendConfig) -> ApiResult<Self> {
        let forwarder = ConsultationForwarder::new(backend)
            .map_err(|e| ApiError::Internal(format!("HTTP client: {}", e)))?;
        let blob_store = FsBlobStore::new(storage_root.clone(), &backend.backend_url);

        Ok(Self {
            db,
            blob_store: Arc::new(blob_store),
            storage_root,
            scorer: None,
            forwarder,
            startup_time: Utc::now(),
        })
    }

    /// Run `scorer` after each consultation is created
    pub fn with_scorer(mut self, scorer: Arc<dyn Scorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    // Webhook endpoints (CORS, OPTIONS answered without a body)
    let functions = Router::new()
        .route(
            "/functions/v1/process-email",
            post(api::process_email)
                .options(api::preflight)
                .layer(DefaultBodyLimit::max(api::intake::MAX_REQUEST_BYTES)),
        )
        .route(
            "/functions/v1/process-consultation",
            post(api::process_consultation).options(api::preflight),
        )
        .layer(api::cors_layer());

    // Dashboard and diagnostics
    let public = Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/dashboard/cards", get(api::serve_cards))
        .route("/api/consultations", get(api::list_consultations))
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes());

    let storage = ServeDir::new(&state.storage_root);

    Router::new()
        .merge(functions)
        .merge(public)
        .nest_service(services::storage::PUBLIC_PREFIX, storage)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
