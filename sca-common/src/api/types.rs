//! Shared API request/response types
//!
//! Field names follow the JSON contract the webhook endpoints speak, which
//! is camelCase on the wire (`audioUrl`).

use serde::{Deserialize, Serialize};

// ========================================
// Consultation Creation
// ========================================

/// Body of `POST /functions/v1/process-consultation`
///
/// # Examples
///
/// ```
/// use sca_common::api::types::ProcessConsultationRequest;
///
/// let req: ProcessConsultationRequest = serde_json::from_str(
///     r#"{"email":"a@example.com","audioUrl":"http://host/a.mp3"}"#,
/// ).unwrap();
/// assert_eq!(req.audio_url, "http://host/a.mp3");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ProcessConsultationRequest {
    /// Sender address the consultation is attributed to
    pub email: String,

    /// Public URL of the uploaded recording
    #[serde(rename = "audioUrl")]
    pub audio_url: String,
}

// ========================================
// Responses
// ========================================

/// Success body carrying only a message
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Success body of the email-intake webhook
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IntakeResponse {
    pub message: String,
    pub success: bool,
}

/// Error body returned on every 400 response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
