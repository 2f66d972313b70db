//! Configuration loading and root folder resolution
//!
//! Every setting resolves in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing or unreadable TOML file never aborts startup.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the root folder
pub const ENV_ROOT_FOLDER: &str = "SCA_ROOT_FOLDER";
/// Environment variable naming the public backend URL
pub const ENV_BACKEND_URL: &str = "SCA_BACKEND_URL";
/// Environment variable holding the backend access key
pub const ENV_ACCESS_KEY: &str = "SCA_ACCESS_KEY";

/// Default HTTP port for sca-server
pub const DEFAULT_PORT: u16 = 5730;

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "sca.db";
/// Blob storage directory inside the root folder
pub const STORAGE_DIR: &str = "storage";

/// Bootstrap configuration loaded from TOML file
///
/// All fields are optional; anything absent falls through to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the database and blob storage
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// Publicly reachable base URL of this backend
    #[serde(default)]
    pub backend_url: Option<String>,

    /// Access key sent as a bearer token on internal calls
    #[serde(default)]
    pub access_key: Option<String>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load the platform config file, falling back to defaults
    ///
    /// Missing file is normal; a malformed file is logged and ignored.
    pub fn load() -> Self {
        let Some(path) = find_config_file() else {
            return Self::default();
        };

        match Self::from_path(&path) {
            Ok(config) => {
                info!("Loaded config file: {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Locate the config file for the platform
///
/// Tries `<config_dir>/sca/config.toml` first, then `/etc/sca/config.toml`
/// on Linux.
fn find_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("sca").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/sca/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Resolve the root folder
pub fn resolve_root_folder(cli_arg: Option<&Path>, toml: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Some(path) = non_empty_env(ENV_ROOT_FOLDER) {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Some(path) = &toml.root_folder {
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("sca"))
        .unwrap_or_else(|| PathBuf::from("./sca_data"))
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Backend endpoint and credentials
///
/// `backend_url` is the public base URL of the server: blob URLs and the
/// internal consultation-creation call are both derived from it.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub backend_url: String,
    pub access_key: String,
}

impl BackendConfig {
    /// Resolve from CLI, environment, TOML, then defaults
    ///
    /// Defaults to `http://127.0.0.1:<port>` with an empty access key.
    pub fn resolve(
        cli_url: Option<&str>,
        cli_key: Option<&str>,
        toml: &TomlConfig,
        port: u16,
    ) -> Self {
        let backend_url = cli_url
            .map(str::to_string)
            .or_else(|| non_empty_env(ENV_BACKEND_URL))
            .or_else(|| toml.backend_url.clone())
            .unwrap_or_else(|| format!("http://127.0.0.1:{}", port));

        let access_key = cli_key
            .map(str::to_string)
            .or_else(|| non_empty_env(ENV_ACCESS_KEY))
            .or_else(|| toml.access_key.clone())
            .unwrap_or_default();

        Self::new(backend_url, access_key)
    }

    /// Build directly, normalizing away a trailing slash
    pub fn new(backend_url: impl Into<String>, access_key: impl Into<String>) -> Self {
        let backend_url = backend_url.into().trim_end_matches('/').to_string();
        Self {
            backend_url,
            access_key: access_key.into(),
        }
    }
}

/// Creates the root folder layout on startup
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    /// Create the root folder and its storage directory if missing
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            info!("Creating root folder: {}", self.root_folder.display());
        }
        std::fs::create_dir_all(&self.root_folder)?;
        std::fs::create_dir_all(self.storage_path())?;
        Ok(())
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE)
    }

    pub fn storage_path(&self) -> PathBuf {
        self.root_folder.join(STORAGE_DIR)
    }
}
