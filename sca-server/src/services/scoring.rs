//! Consultation scoring
//!
//! Every consultation is created with one placeholder "Overall" score, written
//! in the same transaction as the consultation. Real analysis plugs in as a
//! [`Scorer`] that runs after the consultation is committed; its scores are
//! added alongside the placeholder and its failures are reported on their own
//! without touching the consultation.
//!
//! Whether a real scorer works from the transcript or from the audio is left
//! open, so [`ScoringInput`] carries both.

use async_trait::async_trait;
use thiserror::Error;

/// Category of the placeholder score
pub const PLACEHOLDER_CATEGORY: &str = "Overall";
/// Value of the placeholder score
pub const PLACEHOLDER_SCORE: i64 = 75;
/// Notes attached to the placeholder score
pub const PLACEHOLDER_NOTES: &str = "Placeholder score";

/// What a scorer gets to look at
#[derive(Debug, Clone)]
pub struct ScoringInput {
    pub consultation_id: String,
    pub audio_url: String,
    pub transcript: Option<String>,
}

/// A score not yet persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreDraft {
    pub category: String,
    pub score: i64,
    pub notes: String,
}

/// Scoring errors
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Scoring failed: {0}")]
    Failed(String),

    #[error("Scorer produced no scores")]
    Empty,

    #[error("Score for {category} out of range: {score}")]
    OutOfRange { category: String, score: i64 },

    #[error("Storing scores failed: {0}")]
    Database(#[from] sqlx::Error),
}

/// Produces additional scores for a committed consultation
#[async_trait]
pub trait Scorer: Send + Sync {
    /// Scorer name for logging
    fn name(&self) -> &'static str;

    /// Score one consultation
    async fn score(&self, input: &ScoringInput) -> Result<Vec<ScoreDraft>, ScoringError>;
}

/// The score every new consultation starts with
pub fn placeholder_draft() -> ScoreDraft {
    ScoreDraft {
        category: PLACEHOLDER_CATEGORY.to_string(),
        score: PLACEHOLDER_SCORE,
        notes: PLACEHOLDER_NOTES.to_string(),
    }
}

/// Check drafts before they reach the database
///
/// A scorer must return at least one score, each within 0..=100.
pub fn validate_drafts(drafts: &[ScoreDraft]) -> Result<(), ScoringError> {
    if drafts.is_empty() {
        return Err(ScoringError::Empty);
    }
    if let Some(bad) = drafts.iter().find(|d| !(0..=100).contains(&d.score)) {
        return Err(ScoringError::OutOfRange {
            category: bad.category.clone(),
            score: bad.score,
        });
    }
    Ok(())
}
