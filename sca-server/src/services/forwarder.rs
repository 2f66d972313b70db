//! Intake → consultation-creation forwarding
//!
//! The intake handler does not write consultations itself; it POSTs
//! `{email, audioUrl}` to the creation endpoint over HTTP, authenticated
//! with the backend access key as a bearer token.

use reqwest::Client;
use sca_common::api::ProcessConsultationRequest;
use sca_common::config::BackendConfig;
use std::time::Duration;
use thiserror::Error;

/// Path of the consultation-creation endpoint relative to the backend URL
pub const PROCESS_CONSULTATION_PATH: &str = "/functions/v1/process-consultation";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Forwarding errors
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Consultation endpoint returned {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// HTTP client for the consultation-creation endpoint
#[derive(Debug, Clone)]
pub struct ConsultationForwarder {
    client: Client,
    endpoint: String,
    access_key: String,
}

impl ConsultationForwarder {
    pub fn new(backend: &BackendConfig) -> Result<Self, ForwardError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}{}", backend.backend_url, PROCESS_CONSULTATION_PATH),
            access_key: backend.access_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST the request; any non-2xx status is an error
    pub async fn forward(&self, request: &ProcessConsultationRequest) -> Result<(), ForwardError> {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if !self.access_key.is_empty() {
            builder = builder.bearer_auth(&self.access_key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(ForwardError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
