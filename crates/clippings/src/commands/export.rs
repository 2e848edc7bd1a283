//! Single notebook export command.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clippings_core::{extract_file, NoteKind};
use clippings_render::{ExportFormat, ExportOptions, Exporter, MarkdownOptions};

use crate::config::load_config;

/// Run the export command.
pub async fn run(
    config_path: &Path,
    input: PathBuf,
    output: Option<PathBuf>,
    format: Option<ExportFormat>,
    frontmatter: bool,
) -> Result<()> {
    let config = load_config(config_path)?;

    let format = format
        .or_else(|| output.as_deref().and_then(format_from_extension))
        .unwrap_or(config.export.format);

    let exporter = Exporter::new(ExportOptions {
        markdown: MarkdownOptions {
            frontmatter: frontmatter || config.export.frontmatter,
        },
        minify: config.preview.minify,
    })?;

    let clippings = extract_file(&input)?;
    tracing::info!(
        "Extracted {} highlights and {} notes from \"{}\"",
        clippings.count(NoteKind::Highlight),
        clippings.count(NoteKind::Note),
        clippings.title
    );

    let rendered = exporter.render(&clippings, format)?;

    match output {
        Some(path) => {
            fs::write(&path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {} export to {}", format, path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .context("Failed to write to stdout")?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Infer the export format from an output file name.
fn format_from_extension(path: &Path) -> Option<ExportFormat> {
    match path.extension()?.to_str()?.to_lowercase().as_str() {
        "md" | "markdown" => Some(ExportFormat::Markdown),
        "html" | "htm" => Some(ExportFormat::Html),
        "json" => Some(ExportFormat::Json),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn infers_format_from_output() {
        assert_eq!(
            format_from_extension(Path::new("notes/dune.md")),
            Some(ExportFormat::Markdown)
        );
        assert_eq!(
            format_from_extension(Path::new("dune.HTML")),
            Some(ExportFormat::Html)
        );
        assert_eq!(
            format_from_extension(Path::new("dune.json")),
            Some(ExportFormat::Json)
        );
        assert_eq!(format_from_extension(Path::new("dune.txt")), None);
        assert_eq!(format_from_extension(Path::new("dune")), None);
    }

    #[tokio::test]
    async fn exports_markdown_file() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("dune.html");
        let output = temp.path().join("dune.md");
        fs::write(
            &input,
            r#"<div class="bookTitle">Dune</div>
<div class="authors">Herbert, Frank</div>
<div class="noteHeading">Note - Location 10</div>
<div class="noteText">Remember this.</div>"#,
        )
        .unwrap();

        run(
            &temp.path().join("clippings.toml"),
            input,
            Some(output.clone()),
            None,
            false,
        )
        .await
        .unwrap();

        assert_eq!(
            fs::read_to_string(output).unwrap(),
            "# Dune\n*Herbert, Frank*\n\n**Note:** Remember this.\n*Location 10*\n\n"
        );
    }

    #[tokio::test]
    async fn rejects_wrong_input_kind() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("notes.txt");
        fs::write(&input, "plain text").unwrap();

        let result = run(&temp.path().join("clippings.toml"), input, None, None, false).await;

        assert!(result.is_err());
    }
}
