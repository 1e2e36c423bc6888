//! Rolegate CLI
//!
//! Compiles declarative policy documents into resolved model snapshots.
//!
//! # Usage
//!
//! ```bash
//! # Validate a document and save a snapshot under the cache directory
//! rolegate create policy.yml
//!
//! # Write the resolved model next to the source for inspection
//! rolegate export policy.yml --format json -o resolved.json
//! ```
//!
//! Snapshot paths come from `ROLEGATE_CACHE_DIR` / `ROLEGATE_SNAPSHOT_FILE`
//! environment variables, falling back to `.rolegate_cache/`.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rolegate_storage::{
    export_model, resolve_from_path, save_snapshot, DocumentFormat, StorageConfig,
};

/// Rolegate - compile role/permission policies into resolved models
#[derive(Parser, Debug)]
#[command(name = "rolegate")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a policy document and save a resolved snapshot
    Create {
        /// Path to the policy document (YAML or JSON)
        file: PathBuf,
    },
    /// Resolve a policy document and write the resolved model out
    Export {
        /// Path to the policy document (YAML or JSON)
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ExportFormat,

        /// Output path (defaults to the input path with a `.resolved` suffix)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ExportFormat {
    Yaml,
    Json,
}

impl From<ExportFormat> for DocumentFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Yaml => DocumentFormat::Yaml,
            ExportFormat::Json => DocumentFormat::Json,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Command::Create { file } => {
            let model = resolve_from_path(&file)
                .with_context(|| format!("could not resolve {}", file.display()))?;
            let config = StorageConfig::from_env().context("invalid storage configuration")?;
            let path = save_snapshot(&model, &config).context("could not save snapshot")?;
            info!(
                organizations = model.organizations().len(),
                roles = model.roles().len(),
                snapshot = %path.display(),
                "policy compiled"
            );
            println!("Success! Snapshot written to {}", path.display());
        }
        Command::Export {
            file,
            format,
            output,
        } => {
            let model = resolve_from_path(&file)
                .with_context(|| format!("could not resolve {}", file.display()))?;
            let output = output.unwrap_or_else(|| {
                let extension = match format {
                    ExportFormat::Yaml => "resolved.yml",
                    ExportFormat::Json => "resolved.json",
                };
                file.with_extension(extension)
            });
            export_model(&model, &output, format.into())
                .with_context(|| format!("could not export to {}", output.display()))?;
            println!("Success! Resolved model written to {}", output.display());
        }
    }
    Ok(())
}
