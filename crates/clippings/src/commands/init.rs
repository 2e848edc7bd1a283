//! Write a default configuration file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::DEFAULT_CONFIG;

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    if config_path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!("Created {}", config_path.display());
    tracing::info!("Run 'clippings export <notebook.html>' to convert an export.");

    Ok(())
}
