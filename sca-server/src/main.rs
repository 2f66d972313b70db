//! sca-server - Sales Consultation Analyzer
//!
//! Receives inbound-mail webhooks carrying sales-call recordings, records a
//! consultation with placeholder scores for each, and serves a dashboard
//! listing them.

use anyhow::{Context, Result};
use clap::Parser;
use sca_common::config::{
    resolve_root_folder, BackendConfig, RootFolderInitializer, TomlConfig, DEFAULT_PORT,
};
use sca_server::{build_router, AppState};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for sca-server
#[derive(Parser, Debug)]
#[command(name = "sca-server")]
#[command(about = "Sales Consultation Analyzer: email intake and dashboard")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "SCA_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Folder holding the database and stored recordings
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Public base URL of this server (blob URLs and internal calls derive from it)
    #[arg(long)]
    backend_url: Option<String>,

    /// Access key sent as bearer token on internal calls
    #[arg(long)]
    access_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let toml_config = TomlConfig::load();

    let default_filter = format!(
        "sca_server={level},sca_common={level},tower_http={level}",
        level = toml_config.logging.level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build identification first, before any slow startup work
    info!(
        "Starting Sales Consultation Analyzer (sca-server) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let port = args.port.or(toml_config.port).unwrap_or(DEFAULT_PORT);
    let root_folder = resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    let backend = BackendConfig::resolve(
        args.backend_url.as_deref(),
        args.access_key.as_deref(),
        &toml_config,
        port,
    );

    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to initialize root folder")?;
    info!("Root folder: {}", initializer.root_folder().display());

    let pool = sca_common::db::init_database(&initializer.database_path())
        .await
        .context("Failed to open database")?;
    info!("✓ Database ready: {}", initializer.database_path().display());

    info!("Backend URL: {}", backend.backend_url);
    if backend.access_key.is_empty() {
        info!("No access key configured; internal calls are sent without a bearer token");
    }

    let state = AppState::new(pool, initializer.storage_path(), &backend)
        .context("Failed to build application state")?;
    let app = build_router(state);

    let addr = SocketAddr::new(args.bind, port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("sca-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("sca-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
