//! Versioned snapshots of the resolved model.
//!
//! A snapshot is an explicit data contract, not opaque object serialization:
//! every model field (both reverse indexes included) is serialized, prefixed
//! with a format version, and reloaded verbatim; resolution never runs on
//! load. Bumping [`SNAPSHOT_VERSION`] invalidates old snapshots instead of
//! letting them deserialize into something subtly wrong.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;

use rolegate_core::PolicyModel;

use crate::error::{StorageError, StorageResult};
use crate::settings::StorageConfig;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    model: PolicyModel,
}

/// Writes the model under the configured cache path, creating the cache
/// directory when missing. Returns the written path.
pub fn save_snapshot(model: &PolicyModel, config: &StorageConfig) -> StorageResult<PathBuf> {
    fs::create_dir_all(&config.cache_dir)?;
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        model: model.clone(),
    };
    let path = config.snapshot_path();
    fs::write(&path, serde_json::to_vec(&snapshot)?)?;
    info!(path = %path.display(), version = SNAPSHOT_VERSION, "model snapshot saved");
    Ok(path)
}

/// Reads a snapshot back. Fails on a missing file, a different snapshot
/// version, or a body that does not deserialize.
pub fn load_snapshot(config: &StorageConfig) -> StorageResult<PolicyModel> {
    let contents = fs::read(config.snapshot_path())?;
    let snapshot: Snapshot = serde_json::from_slice(&contents)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(StorageError::VersionMismatch {
            found: snapshot.version,
            expected: SNAPSHOT_VERSION,
        });
    }
    Ok(snapshot.model)
}
