//! Consultant persistence
//!
//! Consultants are keyed by their unique email address and created on
//! first sight.

use sca_common::db::Consultant;
use sca_common::uuid_utils;
use sqlx::SqliteConnection;

/// Look up a consultant by exact email
///
/// `Ok(None)` means not found; any other failure is an error.
async fn find_consultant_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<Consultant>, sqlx::Error> {
    sqlx::query_as::<_, Consultant>("SELECT id, name, email FROM consultants WHERE email = ?")
        .bind(email)
        .fetch_optional(conn)
        .await
}

/// Find-or-create the consultant for `email`
///
/// Insert-if-absent keyed on the UNIQUE email, then read back. Two
/// concurrent first submissions from the same address resolve to the same
/// row instead of racing on a read-then-write.
pub async fn upsert_consultant(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Consultant, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO consultants (id, name, email)
        VALUES (?, ?, ?)
        ON CONFLICT(email) DO NOTHING
        "#,
    )
    .bind(uuid_utils::generate_id())
    .bind(Consultant::default_name(email))
    .bind(email)
    .execute(&mut *conn)
    .await?;

    find_consultant_by_email(conn, email)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sca_common::db::init_memory_database;

    #[tokio::test]
    async fn test_missing_consultant_is_none() {
        let pool = init_memory_database().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let found = find_consultant_by_email(&mut conn, "nobody@example.com")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_upsert_creates_then_reuses() {
        let pool = init_memory_database().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let first = upsert_consultant(&mut conn, "a@example.com").await.unwrap();
        assert_eq!(first.name, "a");
        assert_eq!(first.email, "a@example.com");

        let second = upsert_consultant(&mut conn, "a@example.com").await.unwrap();
        assert_eq!(second.id, first.id);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM consultants")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_upsert_never_renames() {
        let pool = init_memory_database().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        sqlx::query("INSERT INTO consultants (id, name, email) VALUES ('k1', 'Alice Smith', 'alice@example.com')")
            .execute(&mut *conn)
            .await
            .unwrap();

        let consultant = upsert_consultant(&mut conn, "alice@example.com").await.unwrap();
        assert_eq!(consultant.id, "k1");
        assert_eq!(consultant.name, "Alice Smith");
    }
}
