//! rolegate-storage: declaration loading and model persistence
//!
//! This crate wraps the core engine with file I/O:
//! - loading raw policy declarations from YAML/JSON documents
//! - saving/loading versioned snapshots of the resolved model
//! - exporting the resolved model for inspection
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              rolegate-storage                │
//! ├─────────────────────────────────────────────┤
//! │  document.rs - YAML/JSON load and export    │
//! │  snapshot.rs - versioned model snapshots    │
//! │  settings.rs - path config + env overrides  │
//! └─────────────────────────────────────────────┘
//! ```

pub mod document;
pub mod error;
pub mod settings;
pub mod snapshot;

// Re-export commonly used items
pub use document::{export_model, load_declaration, resolve_from_path, DocumentFormat};
pub use error::{StorageError, StorageResult};
pub use settings::StorageConfig;
pub use snapshot::{load_snapshot, save_snapshot, SNAPSHOT_VERSION};
