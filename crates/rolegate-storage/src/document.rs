//! Loading raw policy documents and exporting resolved models.

use std::fs;
use std::path::Path;

use tracing::info;

use rolegate_core::{PolicyDeclaration, PolicyModel};

use crate::error::{StorageError, StorageResult};

/// Document formats understood by the loader and exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    #[default]
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> StorageResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yml") | Some("yaml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(StorageError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Reads a raw declaration from a YAML or JSON document.
pub fn load_declaration(path: impl AsRef<Path>) -> StorageResult<PolicyDeclaration> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let declaration = match DocumentFormat::from_path(path)? {
        DocumentFormat::Yaml => serde_yaml::from_str(&contents)?,
        DocumentFormat::Json => serde_json::from_str(&contents)?,
    };
    Ok(declaration)
}

/// Loads a declaration and resolves it in one step.
pub fn resolve_from_path(path: impl AsRef<Path>) -> StorageResult<PolicyModel> {
    let path = path.as_ref();
    let declaration = load_declaration(path)?;
    let model = PolicyModel::resolve(declaration)?;
    info!(path = %path.display(), "policy document resolved");
    Ok(model)
}

/// Writes the resolved model (indexes included) to `path` in `format`.
pub fn export_model(
    model: &PolicyModel,
    path: impl AsRef<Path>,
    format: DocumentFormat,
) -> StorageResult<()> {
    let path = path.as_ref();
    let contents = match format {
        DocumentFormat::Yaml => serde_yaml::to_string(model)?,
        DocumentFormat::Json => serde_json::to_string_pretty(model)?,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, contents)?;
    info!(path = %path.display(), "resolved model exported");
    Ok(())
}
