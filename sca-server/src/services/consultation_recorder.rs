//! Transactional consultation creation
//!
//! Resolves the consultant, inserts the consultation, and inserts its
//! placeholder score as one unit: either all three land or none do. An
//! optional [`Scorer`] then runs against the committed consultation; its
//! outcome is reported separately and never undoes the creation.

use sca_common::db::{Consultation, Score};
use sca_common::{time, uuid_utils};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

use crate::db;
use crate::error::ApiResult;
use crate::services::scoring::{
    placeholder_draft, validate_drafts, ScoreDraft, Scorer, ScoringError, ScoringInput,
};

/// Result of the post-creation scoring step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoringStatus {
    /// No scorer configured; only the placeholder exists
    NotConfigured,
    /// Scorer ran and its scores were stored
    Scored { score_ids: Vec<String> },
    /// Scorer or score storage failed; the consultation stands
    Failed { reason: String },
}

/// Rows written for one consultation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedConsultation {
    pub consultant_id: String,
    pub consultation_id: String,
    /// Id of the placeholder score written with the consultation
    pub placeholder_score_id: String,
    pub scoring: ScoringStatus,
}

/// Record a consultation for `email` with the recording at `audio_url`
///
/// Errors only when the creation transaction fails. Scoring problems show
/// up in [`RecordedConsultation::scoring`].
pub async fn record_consultation(
    pool: &SqlitePool,
    scorer: Option<&dyn Scorer>,
    email: &str,
    audio_url: &str,
) -> ApiResult<RecordedConsultation> {
    let consultation_id = uuid_utils::generate_id();

    let mut tx = pool.begin().await?;

    let consultant = db::upsert_consultant(&mut tx, email).await?;

    db::insert_consultation(
        &mut tx,
        &Consultation {
            id: consultation_id.clone(),
            consultant_id: consultant.id.clone(),
            audio_url: audio_url.to_string(),
            transcript: None,
            email_source: email.to_string(),
            created_at: time::now_storage(),
        },
    )
    .await?;

    let placeholder_score_id = insert_draft(&mut tx, &consultation_id, placeholder_draft()).await?;

    tx.commit().await?;

    info!(
        "Recorded consultation {} for {} (consultant {})",
        consultation_id, email, consultant.id
    );

    let scoring = match scorer {
        None => ScoringStatus::NotConfigured,
        Some(scorer) => {
            let input = ScoringInput {
                consultation_id: consultation_id.clone(),
                audio_url: audio_url.to_string(),
                transcript: None,
            };
            match run_scorer(pool, scorer, &input).await {
                Ok(score_ids) => {
                    info!(
                        "Scorer '{}' added {} score(s) to consultation {}",
                        scorer.name(),
                        score_ids.len(),
                        consultation_id
                    );
                    ScoringStatus::Scored { score_ids }
                }
                Err(e) => {
                    warn!(
                        "Scorer '{}' failed for consultation {}: {}",
                        scorer.name(),
                        consultation_id,
                        e
                    );
                    ScoringStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            }
        }
    };

    Ok(RecordedConsultation {
        consultant_id: consultant.id,
        consultation_id,
        placeholder_score_id,
        scoring,
    })
}

/// Score a committed consultation and store the drafts in their own transaction
async fn run_scorer(
    pool: &SqlitePool,
    scorer: &dyn Scorer,
    input: &ScoringInput,
) -> Result<Vec<String>, ScoringError> {
    let drafts = scorer.score(input).await?;
    validate_drafts(&drafts)?;

    let mut tx = pool.begin().await?;
    let mut score_ids = Vec::with_capacity(drafts.len());
    for draft in drafts {
        score_ids.push(insert_draft(&mut tx, &input.consultation_id, draft).await?);
    }
    tx.commit().await?;

    Ok(score_ids)
}

async fn insert_draft(
    conn: &mut SqliteConnection,
    consultation_id: &str,
    draft: ScoreDraft,
) -> Result<String, sqlx::Error> {
    let score = Score {
        id: uuid_utils::generate_id(),
        consultation_id: consultation_id.to_string(),
        category: draft.category,
        score: draft.score,
        notes: draft.notes,
    };
    db::insert_score(conn, &score).await?;
    Ok(score.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use async_trait::async_trait;
    use sca_common::db::init_memory_database;

    struct FailingScorer;

    #[async_trait]
    impl Scorer for FailingScorer {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn score(&self, _input: &ScoringInput) -> Result<Vec<ScoreDraft>, ScoringError> {
            Err(ScoringError::Failed("model unavailable".to_string()))
        }
    }

    struct FixedScorer(Vec<ScoreDraft>);

    #[async_trait]
    impl Scorer for FixedScorer {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn score(&self, _input: &ScoringInput) -> Result<Vec<ScoreDraft>, ScoringError> {
            Ok(self.0.clone())
        }
    }

    fn draft(category: &str, score: i64) -> ScoreDraft {
        ScoreDraft {
            category: category.to_string(),
            score,
            notes: String::new(),
        }
    }

    async fn count(pool: &SqlitePool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_records_consultant_consultation_and_placeholder_score() {
        let pool = init_memory_database().await.unwrap();

        let recorded = record_consultation(&pool, None, "a@example.com", "http://x/a.mp3")
            .await
            .unwrap();
        assert_eq!(recorded.scoring, ScoringStatus::NotConfigured);

        let (category, score, notes): (String, i64, String) = sqlx::query_as(
            "SELECT category, score, notes FROM scores WHERE consultation_id = ?",
        )
        .bind(&recorded.consultation_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(category, "Overall");
        assert_eq!(score, 75);
        assert_eq!(notes, "Placeholder score");

        let (email_source, transcript): (String, Option<String>) = sqlx::query_as(
            "SELECT email_source, transcript FROM consultations WHERE id = ?",
        )
        .bind(&recorded.consultation_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(email_source, "a@example.com");
        assert!(transcript.is_none());
    }

    #[tokio::test]
    async fn test_same_email_reuses_consultant() {
        let pool = init_memory_database().await.unwrap();

        let first = record_consultation(&pool, None, "a@example.com", "http://x/1.mp3")
            .await
            .unwrap();
        let second = record_consultation(&pool, None, "a@example.com", "http://x/2.mp3")
            .await
            .unwrap();

        assert_eq!(first.consultant_id, second.consultant_id);
        assert_ne!(first.consultation_id, second.consultation_id);
        assert_eq!(count(&pool, "consultants").await, 1);
        assert_eq!(count(&pool, "consultations").await, 2);
        assert_eq!(count(&pool, "scores").await, 2);
    }

    #[tokio::test]
    async fn test_scorer_failure_keeps_consultation() {
        let pool = init_memory_database().await.unwrap();

        let recorded = record_consultation(
            &pool,
            Some(&FailingScorer),
            "new@example.com",
            "http://x/a.mp3",
        )
        .await
        .unwrap();

        assert!(matches!(
            &recorded.scoring,
            ScoringStatus::Failed { reason } if reason.contains("model unavailable")
        ));
        assert_eq!(count(&pool, "consultants").await, 1);
        assert_eq!(count(&pool, "consultations").await, 1);
        assert_eq!(count(&pool, "scores").await, 1);
    }

    #[tokio::test]
    async fn test_out_of_range_scores_are_discarded_together() {
        let pool = init_memory_database().await.unwrap();
        let scorer = FixedScorer(vec![draft("Rapport", 80), draft("Closing", 140)]);

        let recorded = record_consultation(&pool, Some(&scorer), "a@example.com", "http://x/a.mp3")
            .await
            .unwrap();

        assert!(matches!(recorded.scoring, ScoringStatus::Failed { .. }));
        assert_eq!(count(&pool, "scores").await, 1);
    }

    #[tokio::test]
    async fn test_scorer_scores_are_added_after_placeholder() {
        let pool = init_memory_database().await.unwrap();
        let scorer = FixedScorer(vec![draft("Rapport", 90), draft("Closing", 40)]);

        let recorded = record_consultation(&pool, Some(&scorer), "a@example.com", "http://x/a.mp3")
            .await
            .unwrap();

        match &recorded.scoring {
            ScoringStatus::Scored { score_ids } => assert_eq!(score_ids.len(), 2),
            other => panic!("unexpected scoring status: {:?}", other),
        }

        let categories: Vec<String> =
            sqlx::query_scalar("SELECT category FROM scores ORDER BY rowid")
                .fetch_all(&pool)
                .await
                .unwrap();
        assert_eq!(categories, vec!["Overall", "Rapport", "Closing"]);
    }

    #[tokio::test]
    async fn test_failed_score_insert_rolls_back_everything() {
        let pool = init_memory_database().await.unwrap();
        // Make the third write fail after the first two succeed
        sqlx::query("DROP TABLE scores").execute(&pool).await.unwrap();

        let result = record_consultation(&pool, None, "new@example.com", "http://x/a.mp3").await;

        assert!(matches!(result, Err(ApiError::Database(_))));
        assert_eq!(count(&pool, "consultants").await, 0);
        assert_eq!(count(&pool, "consultations").await, 0);
    }
}
