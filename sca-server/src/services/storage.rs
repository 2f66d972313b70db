//! Blob storage for uploaded recordings
//!
//! Objects are addressed by a relative `/`-separated path such as
//! `recordings/call.mp3`. Writes overwrite any existing object at that path.

use async_trait::async_trait;
use reqwest::Url;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// URL prefix under which stored objects are publicly served
pub const PUBLIC_PREFIX: &str = "/storage/v1/object/public/consultations";

/// Blob storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error("Storage write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Object store for audio blobs
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `bytes` at `path`, replacing any existing object
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<(), StorageError>;

    /// Publicly reachable URL for the object at `path`
    fn public_url(&self, path: &str) -> String;
}

/// Filesystem-backed blob store
///
/// Objects live under `root`; `build_router` serves the same directory at
/// [`PUBLIC_PREFIX`], which is what `public_url` points at.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
    public_base: String,
}

impl FsBlobStore {
    pub fn new(root: PathBuf, backend_url: &str) -> Self {
        Self {
            root,
            public_base: format!("{}{}", backend_url.trim_end_matches('/'), PUBLIC_PREFIX),
        }
    }

    /// Resolve `path` under the root, refusing anything that could escape it
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        let clean = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !clean {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, &bytes).await?;

        debug!(
            "Stored {} bytes ({}) at {}",
            bytes.len(),
            content_type,
            target.display()
        );
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        // Percent-encode each segment so filenames with spaces stay valid links
        match Url::parse(&self.public_base) {
            Ok(mut url) => {
                if let Ok(mut segments) = url.path_segments_mut() {
                    segments.pop_if_empty().extend(path.split('/'));
                }
                url.to_string()
            }
            Err(_) => format!("{}/{}", self.public_base, path),
        }
    }
}
