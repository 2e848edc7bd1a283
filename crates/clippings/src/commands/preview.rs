//! Standalone preview page command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clippings_core::extract_file;
use clippings_render::PageRenderer;

use crate::config::load_config;

/// Run the preview command.
pub async fn run(
    config_path: &Path,
    input: PathBuf,
    output: Option<PathBuf>,
    minify: Option<bool>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let minify = minify.unwrap_or(config.preview.minify);

    let clippings = extract_file(&input)?;
    let html = PageRenderer::new()?.render_clippings(&clippings, minify)?;

    let output = output.unwrap_or_else(|| default_output(&input));
    fs::write(&output, html).with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(
        "Wrote preview of \"{}\" ({} items) to {}",
        clippings.title,
        clippings.items.len(),
        output.display()
    );

    Ok(())
}

/// `notebook.html` -> `notebook.preview.html`, next to the input.
fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("clippings");
    input.with_file_name(format!("{}.preview.html", stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_preview_next_to_input() {
        assert_eq!(
            default_output(Path::new("exports/Dune.html")),
            PathBuf::from("exports/Dune.preview.html")
        );
    }

    #[tokio::test]
    async fn writes_preview_page() {
        let temp = tempfile::tempdir().unwrap();
        let input = temp.path().join("dune.htm");
        fs::write(&input, r#"<div class="bookTitle">Dune</div>"#).unwrap();

        run(&temp.path().join("clippings.toml"), input, None, Some(false))
            .await
            .unwrap();

        let html = fs::read_to_string(temp.path().join("dune.preview.html")).unwrap();
        assert!(html.contains("<title>Dune</title>"));
        assert!(html.contains(r#"<meta name="author" content="Unknown Author">"#));
    }
}
