//! Consultation persistence and the dashboard read

use sca_common::db::{Consultant, Consultation, ConsultationDetail, Score};
use sqlx::{Row, SqliteConnection, SqlitePool};
use std::collections::HashMap;

/// Insert one consultation row
pub async fn insert_consultation(
    conn: &mut SqliteConnection,
    consultation: &Consultation,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO consultations (
            id, consultant_id, audio_url, transcript, email_source, created_at
        ) VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&consultation.id)
    .bind(&consultation.consultant_id)
    .bind(&consultation.audio_url)
    .bind(&consultation.transcript)
    .bind(&consultation.email_source)
    .bind(&consultation.created_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// All consultations with consultant and scores nested, newest first
///
/// Ties on `created_at` fall back to insertion order, newest first.
pub async fn list_consultation_details(
    pool: &SqlitePool,
) -> Result<Vec<ConsultationDetail>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT c.id, c.audio_url, c.transcript, c.email_source, c.created_at,
               k.id AS consultant_id, k.name AS consultant_name, k.email AS consultant_email
        FROM consultations c
        JOIN consultants k ON k.id = c.consultant_id
        ORDER BY c.created_at DESC, c.rowid DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let scores = sqlx::query_as::<_, Score>(
        "SELECT id, consultation_id, category, score, notes FROM scores ORDER BY rowid",
    )
    .fetch_all(pool)
    .await?;

    let mut scores_by_consultation: HashMap<String, Vec<Score>> = HashMap::new();
    for score in scores {
        scores_by_consultation
            .entry(score.consultation_id.clone())
            .or_default()
            .push(score);
    }

    rows.iter()
        .map(|row| -> Result<ConsultationDetail, sqlx::Error> {
            let id: String = row.try_get("id")?;
            let scores = scores_by_consultation.remove(&id).unwrap_or_default();
            Ok(ConsultationDetail {
                audio_url: row.try_get("audio_url")?,
                transcript: row.try_get("transcript")?,
                email_source: row.try_get("email_source")?,
                created_at: row.try_get("created_at")?,
                consultant: Consultant {
                    id: row.try_get("consultant_id")?,
                    name: row.try_get("consultant_name")?,
                    email: row.try_get("consultant_email")?,
                },
                scores,
                id,
            })
        })
        .collect()
}
