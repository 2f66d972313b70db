//! Shared helpers for sca-server integration tests

#![allow(dead_code)]

use sca_common::config::BackendConfig;
use sca_common::db::init_memory_database;
use sca_server::{build_router, AppState};
use sqlx::SqlitePool;
use std::net::SocketAddr;
use tempfile::TempDir;

/// In-process server with an in-memory database and a temporary storage root
pub struct TestServer {
    pub addr: SocketAddr,
    pub db: SqlitePool,
    pub storage: TempDir,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Router over fresh state; internal calls go to a port nothing listens on
pub async fn test_app() -> (axum::Router, SqlitePool, TempDir) {
    let db = init_memory_database().await.expect("in-memory database");
    let storage = tempfile::tempdir().expect("temp dir");
    let backend = BackendConfig::new("http://127.0.0.1:9", "");
    let state = AppState::new(db.clone(), storage.path().to_path_buf(), &backend)
        .expect("app state");
    (build_router(state), db, storage)
}

/// Bind 127.0.0.1:0 and serve; the backend URL points back at this server
pub async fn spawn_server() -> TestServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    spawn_with_backend(listener, &format!("http://{}", addr)).await
}

/// Serve with internal calls sent to `backend_url`
pub async fn spawn_with_backend(listener: tokio::net::TcpListener, backend_url: &str) -> TestServer {
    let addr = listener.local_addr().expect("local addr");
    let db = init_memory_database().await.expect("in-memory database");
    let storage = tempfile::tempdir().expect("temp dir");
    let backend = BackendConfig::new(backend_url, "test-key");
    let state = AppState::new(db.clone(), storage.path().to_path_buf(), &backend)
        .expect("app state");
    let app = build_router(state);

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });

    TestServer { addr, db, storage }
}

pub async fn count(db: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(db)
        .await
        .expect("count rows")
}
