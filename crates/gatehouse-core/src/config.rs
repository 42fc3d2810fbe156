//! Application configuration management.
//!
//! Configuration is stored at `~/.config/gatehouse/config.json` and may be
//! overridden by `GATEHOUSE_*` environment variables. It decides the API base
//! URL and which durable storage backs the session.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::storage::{FileStore, KeyValueStore, KeyringStore, MemoryStore};

/// Application name used for config/data directory paths
const APP_NAME: &str = "gatehouse";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// API base used by development builds
pub const DEVELOPMENT_BASE_URL: &str = "http://localhost:5172/api";

/// API path appended to the configured origin in production
pub const PRODUCTION_API_PATH: &str = "/api";

pub const ENV_MODE: &str = "GATEHOUSE_MODE";
pub const ENV_ORIGIN: &str = "GATEHOUSE_ORIGIN";
pub const ENV_API_BASE_URL: &str = "GATEHOUSE_API_BASE_URL";
pub const ENV_STORAGE: &str = "GATEHOUSE_STORAGE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Production,
    Development,
}

impl Default for BuildMode {
    /// Debug builds talk to the local development server
    fn default() -> Self {
        if cfg!(debug_assertions) {
            BuildMode::Development
        } else {
            BuildMode::Production
        }
    }
}

impl FromStr for BuildMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "prod" | "production" => Ok(BuildMode::Production),
            "dev" | "development" => Ok(BuildMode::Development),
            other => Err(anyhow!("Unknown build mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Keyring,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(StorageBackend::File),
            "keyring" => Ok(StorageBackend::Keyring),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow!("Unknown storage backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub mode: BuildMode,
    /// Scheme and host of the production deployment, e.g. `https://example.com`
    pub origin: Option<String>,
    /// Explicit API base, overrides the mode default
    pub api_base_url: Option<String>,
    pub storage: StorageBackend,
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    /// Load config from disk, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .context("Failed to read config file")?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Apply `GATEHOUSE_*` overrides read through `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(mode) = lookup(ENV_MODE) {
            self.mode = mode.parse()?;
        }
        if let Some(origin) = lookup(ENV_ORIGIN) {
            self.origin = Some(origin);
        }
        if let Some(base) = lookup(ENV_API_BASE_URL) {
            self.api_base_url = Some(base);
        }
        if let Some(storage) = lookup(ENV_STORAGE) {
            self.storage = storage.parse()?;
        }
        Ok(())
    }

    /// Resolve the API base URL for the current mode
    pub fn api_base_url(&self) -> Result<String> {
        if let Some(ref base) = self.api_base_url {
            return Ok(base.trim_end_matches('/').to_string());
        }
        match self.mode {
            BuildMode::Development => Ok(DEVELOPMENT_BASE_URL.to_string()),
            BuildMode::Production => {
                let origin = self.origin.as_deref().ok_or_else(|| {
                    anyhow!("Production mode needs an origin (set {})", ENV_ORIGIN)
                })?;
                Ok(format!("{}{}", origin.trim_end_matches('/'), PRODUCTION_API_PATH))
            }
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Open the configured durable storage
    pub fn open_storage(&self) -> Result<Arc<dyn KeyValueStore>> {
        let storage: Arc<dyn KeyValueStore> = match self.storage {
            StorageBackend::File => Arc::new(FileStore::in_dir(&Self::data_dir()?)),
            StorageBackend::Keyring => Arc::new(KeyringStore::default()),
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
        };
        Ok(storage)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }
}
