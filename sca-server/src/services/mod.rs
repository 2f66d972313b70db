//! Services behind the HTTP handlers
//!
//! - `storage`: blob store for uploaded recordings
//! - `scoring`: placeholder score and the pluggable post-creation scorer
//! - `forwarder`: intake → consultation-creation HTTP call
//! - `consultation_recorder`: transactional consultation creation

pub mod consultation_recorder;
pub mod forwarder;
pub mod scoring;
pub mod storage;

pub use consultation_recorder::{record_consultation, RecordedConsultation, ScoringStatus};
pub use forwarder::{ConsultationForwarder, ForwardError};
pub use scoring::{ScoreDraft, Scorer, ScoringError, ScoringInput};
pub use storage::{BlobStore, FsBlobStore, StorageError};
