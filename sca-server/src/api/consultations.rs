//! Consultation endpoints
//!
//! - `POST /functions/v1/process-consultation`: create a consultation
//! - `GET /api/consultations`: list consultations for the dashboard

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use sca_common::api::{MessageResponse, ProcessConsultationRequest};
use sca_common::db::ConsultationDetail;
use tracing::error;

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::services::record_consultation;
use crate::AppState;

/// POST /functions/v1/process-consultation
///
/// Finds or creates the consultant, then records the consultation and its
/// placeholder score in one transaction. Any failure there is a 400 with the
/// underlying message. A configured scorer runs afterwards; its failure is
/// logged and does not change the response.
pub async fn process_consultation(
    State(state): State<AppState>,
    payload: Result<Json<ProcessConsultationRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    validate_request(&request)?;

    record_consultation(
        &state.db,
        state.scorer.as_deref(),
        request.email.trim(),
        request.audio_url.trim(),
    )
    .await?;

    Ok(Json(MessageResponse::new("Consultation processed successfully")))
}

fn validate_request(request: &ProcessConsultationRequest) -> ApiResult<()> {
    let email = request.email.trim();
    if email.is_empty() {
        return Err(ApiError::BadRequest("Missing email".to_string()));
    }
    if !email.contains('@') {
        return Err(ApiError::BadRequest(format!("Invalid email: {}", email)));
    }
    if request.audio_url.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing audioUrl".to_string()));
    }
    Ok(())
}

/// GET /api/consultations
///
/// Newest first. A failed read is logged and yields an empty list.
pub async fn list_consultations(State(state): State<AppState>) -> Json<Vec<ConsultationDetail>> {
    Json(load_or_empty(&state).await)
}

/// Dashboard read shared by the JSON list and the rendered cards
pub(crate) async fn load_or_empty(state: &AppState) -> Vec<ConsultationDetail> {
    match db::list_consultation_details(&state.db).await {
        Ok(list) => list,
        Err(e) => {
            error!("Error fetching consultations: {}", e);
            Vec::new()
        }
    }
}
