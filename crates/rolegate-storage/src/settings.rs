//! Storage path configuration.
//!
//! No process-wide singleton: callers build a [`StorageConfig`] (defaults,
//! or defaults overridden by `ROLEGATE_*` environment variables) and pass it
//! to the snapshot entry points.

use std::path::{Path, PathBuf};

use config::{Config, Environment};
use serde::{Deserialize, Serialize};

use crate::error::StorageResult;

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".rolegate_cache")
}

fn default_snapshot_file() -> String {
    "model.snapshot.json".to_string()
}

/// Where snapshots of the resolved model live.
///
/// Environment overrides: `ROLEGATE_CACHE_DIR`, `ROLEGATE_SNAPSHOT_FILE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding generated artifacts.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Snapshot file name inside `cache_dir`.
    #[serde(default = "default_snapshot_file")]
    pub snapshot_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            snapshot_file: default_snapshot_file(),
        }
    }
}

impl StorageConfig {
    /// Defaults overridden by `ROLEGATE_*` environment variables.
    pub fn from_env() -> StorageResult<Self> {
        let settings = Config::builder()
            .add_source(Environment::with_prefix("ROLEGATE"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Full path of the snapshot file.
    pub fn snapshot_path(&self) -> PathBuf {
        self.cache_dir.join(&self.snapshot_file)
    }

    /// Replaces the cache directory, e.g. for tests.
    pub fn with_cache_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cache_dir = dir.as_ref().to_path_buf();
        self
    }
}
