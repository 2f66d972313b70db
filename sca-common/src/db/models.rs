//! Database models
//!
//! Row types for the three consultation tables plus the joined view the
//! dashboard reads.

use serde::{Deserialize, Serialize};

/// A sales consultant, identified by email address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Consultant {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl Consultant {
    /// Name given to a consultant first seen at `email`
    ///
    /// The local part before `@`; the whole address if it has no `@`.
    pub fn default_name(email: &str) -> String {
        email.split('@').next().unwrap_or(email).to_string()
    }
}

/// One processed audio submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Consultation {
    pub id: String,
    pub consultant_id: String,
    pub audio_url: String,
    pub transcript: Option<String>,
    pub email_source: String,
    pub created_at: String,
}

/// A named metric attached to a consultation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Score {
    pub id: String,
    pub consultation_id: String,
    pub category: String,
    pub score: i64,
    pub notes: String,
}

/// Consultation with its consultant and scores nested, as listed on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultationDetail {
    pub id: String,
    pub audio_url: String,
    pub transcript: Option<String>,
    pub email_source: String,
    pub created_at: String,
    pub consultant: Consultant,
    pub scores: Vec<Score>,
}
