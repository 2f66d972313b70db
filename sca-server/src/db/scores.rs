//! Score persistence

use sca_common::db::Score;
use sqlx::SqliteConnection;

/// Insert one score row
pub async fn insert_score(conn: &mut SqliteConnection, score: &Score) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO scores (id, consultation_id, category, score, notes)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&score.id)
    .bind(&score.consultation_id)
    .bind(&score.category)
    .bind(score.score)
    .bind(&score.notes)
    .execute(conn)
    .await?;

    Ok(())
}
