//! Directory batch export command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clippings_render::{ExportFormat, ExportOptions, Exporter, MarkdownOptions};

use crate::config::load_config;

/// Run the batch command.
pub async fn run(
    config_path: &Path,
    dir: PathBuf,
    output: Option<PathBuf>,
    format: Option<ExportFormat>,
    frontmatter: bool,
) -> Result<()> {
    tracing::info!("Converting notebook exports in {}...", dir.display());

    let config = load_config(config_path)?;

    let output_dir = output.unwrap_or_else(|| PathBuf::from(&config.export.output_dir));
    let format = format.unwrap_or(config.export.format);

    let exporter = Exporter::new(ExportOptions {
        markdown: MarkdownOptions {
            frontmatter: frontmatter || config.export.frontmatter,
        },
        minify: config.preview.minify,
    })?;

    let summary = exporter.export_dir(&dir, &output_dir, format)?;

    tracing::info!(
        "Converted {} notebooks with {} items in {}ms",
        summary.converted,
        summary.items,
        summary.duration_ms
    );

    for (path, message) in &summary.failed {
        tracing::error!("{}: {}", path.display(), message);
    }

    if !summary.failed.is_empty() {
        anyhow::bail!("{} notebooks could not be converted", summary.failed.len());
    }

    tracing::info!("Output: {}", output_dir.display());

    Ok(())
}
