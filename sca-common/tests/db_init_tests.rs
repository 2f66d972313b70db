//! Unit tests for database initialization

use sca_common::db::init::{init_database, init_memory_database};

async fn table_names(pool: &sqlx::SqlitePool) -> Vec<String> {
    sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("sca.db");

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("sca.db");

    let pool1 = init_database(&db_path).await.unwrap();
    pool1.close().await;

    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());
}

#[tokio::test]
async fn test_schema_has_three_tables() {
    let pool = init_memory_database().await.unwrap();
    assert_eq!(
        table_names(&pool).await,
        vec!["consultants", "consultations", "scores"]
    );
}

#[tokio::test]
async fn test_consultant_email_is_unique() {
    let pool = init_memory_database().await.unwrap();

    sqlx::query("INSERT INTO consultants (id, name, email) VALUES ('1', 'a', 'a@example.com')")
        .execute(&pool)
        .await
        .unwrap();
    let dup = sqlx::query("INSERT INTO consultants (id, name, email) VALUES ('2', 'a', 'a@example.com')")
        .execute(&pool)
        .await;

    assert!(dup.is_err(), "Duplicate email should violate UNIQUE");
}

#[tokio::test]
async fn test_consultation_requires_existing_consultant() {
    let pool = init_memory_database().await.unwrap();

    let orphan = sqlx::query(
        "INSERT INTO consultations (id, consultant_id, audio_url, email_source, created_at)
         VALUES ('c1', 'missing', 'http://x', 'a@example.com', '2026-01-01T00:00:00.000000Z')",
    )
    .execute(&pool)
    .await;

    assert!(orphan.is_err(), "Foreign key should reject unknown consultant");
}

#[tokio::test]
async fn test_score_range_is_checked() {
    let pool = init_memory_database().await.unwrap();

    sqlx::query("INSERT INTO consultants (id, name, email) VALUES ('k', 'a', 'a@example.com')")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO consultations (id, consultant_id, audio_url, email_source, created_at)
         VALUES ('c1', 'k', 'http://x', 'a@example.com', '2026-01-01T00:00:00.000000Z')",
    )
    .execute(&pool)
    .await
    .unwrap();

    let too_high = sqlx::query(
        "INSERT INTO scores (id, consultation_id, category, score, notes) VALUES ('s', 'c1', 'Overall', 101, '')",
    )
    .execute(&pool)
    .await;

    assert!(too_high.is_err());
}
