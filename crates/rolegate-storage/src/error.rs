//! Storage error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors for declaration loading and snapshot persistence.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Model(#[from] rolegate_core::ModelError),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Document extension is neither yaml/yml nor json.
    #[error("unsupported document format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// Snapshot was written by an incompatible version of the contract.
    #[error("snapshot version {found} does not match supported version {expected}")]
    VersionMismatch { found: u32, expected: u32 },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
