//! Concurrent consultation creation against a file-backed database
//!
//! The in-memory pool used elsewhere has a single connection, which
//! serialises every request. These tests open a real pool so first
//! submissions from the same address genuinely overlap.

mod common;

use sca_common::db::init_database;
use sca_server::services::record_consultation;

use common::count;

const SUBMISSIONS: usize = 16;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_submissions_share_one_consultant() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("sca.db")).await.unwrap();

    let handles: Vec<_> = (0..SUBMISSIONS)
        .map(|i| {
            let pool = pool.clone();
            tokio::spawn(async move {
                record_consultation(
                    &pool,
                    None,
                    "new@example.com",
                    &format!("http://x/recordings/call-{}.mp3", i),
                )
                .await
            })
        })
        .collect();

    let mut consultant_ids = Vec::with_capacity(SUBMISSIONS);
    for handle in handles {
        let recorded = handle.await.unwrap().unwrap();
        consultant_ids.push(recorded.consultant_id);
    }

    consultant_ids.dedup();
    assert_eq!(consultant_ids.len(), 1, "all submissions resolve to one consultant");
    assert_eq!(count(&pool, "consultants").await, 1);
    assert_eq!(count(&pool, "consultations").await, SUBMISSIONS as i64);
    assert_eq!(count(&pool, "scores").await, SUBMISSIONS as i64);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_distinct_addresses_create_distinct_consultants() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("sca.db")).await.unwrap();

    let handles: Vec<_> = (0..SUBMISSIONS)
        .map(|i| {
            let pool = pool.clone();
            tokio::spawn(async move {
                // Two submissions per address
                let email = format!("rep{}@example.com", i % 8);
                record_consultation(&pool, None, &email, "http://x/a.mp3").await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(count(&pool, "consultants").await, 8);
    assert_eq!(count(&pool, "consultations").await, SUBMISSIONS as i64);
}
