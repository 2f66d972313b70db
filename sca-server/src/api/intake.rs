//! Email-intake webhook
//!
//! Receives the inbound-mail webhook as multipart form data, stores the MP3
//! attachment, and hands `{email, audioUrl}` to the consultation-creation
//! endpoint. The flow is validate → upload → forward with no retries;
//! resubmitting the same attachment name overwrites the blob and creates a
//! new consultation.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    Json,
};
use sca_common::api::{IntakeResponse, ProcessConsultationRequest};
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Form field carrying the sender address
pub const SENDER_FIELD: &str = "sender";
/// Form field carrying the recording
pub const ATTACHMENT_FIELD: &str = "attachment-1";
/// Only accepted attachment media type
pub const MPEG_AUDIO: &str = "audio/mpeg";
/// Largest accepted attachment (50 MiB)
pub const MAX_ATTACHMENT_BYTES: usize = 50 * 1024 * 1024;
/// Request body cap for the intake route; leaves room for the other mail fields
pub const MAX_REQUEST_BYTES: usize = 64 * 1024 * 1024;
/// Name used when the attachment has none
pub const DEFAULT_FILE_NAME: &str = "recording.mp3";
/// Blob folder for recordings
pub const RECORDINGS_PREFIX: &str = "recordings";

const MSG_NO_SENDER: &str = "No sender email found";
const MSG_NO_ATTACHMENT: &str = "No valid MP3 attachment found";
const MSG_TOO_LARGE: &str = "File size exceeds 50MB limit";

/// Attachment as seen while reading the form
#[derive(Debug)]
enum AttachmentPart {
    Missing,
    WrongType(Option<String>),
    TooLarge,
    Accepted { file_name: String, bytes: Vec<u8> },
}

/// A validated submission ready to upload
#[derive(Debug)]
struct Submission {
    sender: String,
    file_name: String,
    bytes: Vec<u8>,
}

/// POST /functions/v1/process-email
pub async fn process_email(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<IntakeResponse>> {
    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let submission = match read_submission(&mut multipart).await {
        Ok(submission) => submission,
        Err(e) => {
            warn!("Rejected inbound email: {}", e);
            return Err(e);
        }
    };

    let path = format!("{}/{}", RECORDINGS_PREFIX, submission.file_name);
    let size = submission.bytes.len();
    state
        .blob_store
        .put(&path, submission.bytes, MPEG_AUDIO)
        .await?;
    let audio_url = state.blob_store.public_url(&path);
    info!("Stored {} ({} bytes) from {}", path, size, submission.sender);

    state
        .forwarder
        .forward(&ProcessConsultationRequest {
            email: submission.sender,
            audio_url,
        })
        .await
        .map_err(|e| {
            warn!("Consultation processing failed for {}: {}", path, e);
            ApiError::Downstream(e)
        })?;

    Ok(Json(IntakeResponse {
        message: "Email processed successfully".to_string(),
        success: true,
    }))
}

/// Read the form and validate it
///
/// Checks run in a fixed order regardless of field order on the wire:
/// sender, then attachment type, then attachment size. The attachment is
/// streamed and buffering stops as soon as it passes the size cap.
async fn read_submission(multipart: &mut Multipart) -> ApiResult<Submission> {
    let mut sender: Option<String> = None;
    let mut attachment = AttachmentPart::Missing;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(form_error(e, &attachment)),
        };

        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(SENDER_FIELD) => {
                let text = field.text().await.map_err(|e| form_error(e, &attachment))?;
                sender = Some(text.trim().to_string());
            }
            Some(ATTACHMENT_FIELD) => {
                attachment = read_attachment(field).await?;
            }
            // Mail webhooks carry many other fields (subject, body, ...)
            _ => continue,
        }
    }

    let sender = sender
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest(MSG_NO_SENDER.to_string()))?;

    match attachment {
        AttachmentPart::Missing => Err(ApiError::BadRequest(MSG_NO_ATTACHMENT.to_string())),
        AttachmentPart::WrongType(content_type) => {
            warn!("Attachment media type {:?} is not {}", content_type, MPEG_AUDIO);
            Err(ApiError::BadRequest(MSG_NO_ATTACHMENT.to_string()))
        }
        AttachmentPart::TooLarge => Err(ApiError::BadRequest(MSG_TOO_LARGE.to_string())),
        AttachmentPart::Accepted { file_name, bytes } => Ok(Submission {
            sender,
            file_name,
            bytes,
        }),
    }
}

async fn read_attachment(
    mut field: axum::extract::multipart::Field<'_>,
) -> ApiResult<AttachmentPart> {
    let content_type = field.content_type().map(str::to_string);
    if content_type.as_deref() != Some(MPEG_AUDIO) {
        return Ok(AttachmentPart::WrongType(content_type));
    }

    let file_name = sanitize_file_name(field.file_name().unwrap_or_default());
    let mut bytes = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if bytes.len() + chunk.len() > MAX_ATTACHMENT_BYTES {
            // Remaining bytes are drained unbuffered by the next next_field()
            return Ok(AttachmentPart::TooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(AttachmentPart::Accepted { file_name, bytes })
}

/// Multipart read failure; an already-oversized attachment reports as such
fn form_error(err: MultipartError, attachment: &AttachmentPart) -> ApiError {
    match attachment {
        AttachmentPart::TooLarge => ApiError::BadRequest(MSG_TOO_LARGE.to_string()),
        _ => ApiError::BadRequest(err.body_text()),
    }
}

/// Reduce an uploaded file name to a safe single path component
///
/// Directory parts are dropped; empty, `.` and `..` fall back to
/// [`DEFAULT_FILE_NAME`].
pub fn sanitize_file_name(raw: &str) -> String {
    let name = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    if name.is_empty() || name == "." || name == ".." {
        DEFAULT_FILE_NAME.to_string()
    } else {
        name.to_string()
    }
}
