//! Errors raised while opening the database or loading configuration

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Startup failures from the common crate
///
/// Request handling never produces these; the server reports them from
/// `main` and exits.
#[derive(Error, Debug)]
pub enum Error {
    /// Opening the pool or applying the schema failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Root folder or storage directory could not be created
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file unreadable or malformed
    #[error("Configuration error: {0}")]
    Config(String),
}
