//! API module for shared HTTP API types
//!
//! Request and response bodies exchanged between the intake handler, the
//! consultation-creation handler, and webhook callers.
//!
//! This module contains ONLY plain serde types; the server wraps them with
//! axum extractors and responses.

pub mod types;

pub use types::{
    ErrorResponse, IntakeResponse, MessageResponse, ProcessConsultationRequest,
};
