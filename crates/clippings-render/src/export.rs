//! Single document and directory export.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use rayon::prelude::*;
use serde::Deserialize;
use walkdir::WalkDir;

use clippings_core::{extract_file, is_supported_input, Clippings};

use crate::error::{ExportError, RenderError};
use crate::markdown::{render_markdown, MarkdownOptions};
use crate::page::PageRenderer;

/// Output format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Markdown document
    #[default]
    Markdown,
    /// Standalone HTML preview page
    Html,
    /// Extracted data as JSON
    Json,
}

impl ExportFormat {
    /// File extension for exported files.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Html => "html",
            Self::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unknown format '{}' (expected markdown, html or json)",
                other
            )),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Markdown => "markdown",
            Self::Html => "html",
            Self::Json => "json",
        };
        f.write_str(name)
    }
}

/// Options shared by all exports.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Markdown export options
    pub markdown: MarkdownOptions,

    /// Minify the stylesheet of HTML pages
    pub minify: bool,
}

/// Result of a directory export.
#[derive(Debug, Default)]
pub struct ExportSummary {
    /// Number of files converted
    pub converted: usize,

    /// Total number of items across converted files
    pub items: usize,

    /// Files that could not be converted, with the reason
    pub failed: Vec<(PathBuf, String)>,

    /// Total export time in milliseconds
    pub duration_ms: u64,
}

/// Renders clippings into any [`ExportFormat`].
pub struct Exporter {
    options: ExportOptions,
    pages: PageRenderer,
}

impl Exporter {
    /// Create a new exporter.
    pub fn new(options: ExportOptions) -> Result<Self, RenderError> {
        Ok(Self {
            options,
            pages: PageRenderer::new()?,
        })
    }

    /// Render one document.
    pub fn render(&self, clippings: &Clippings, format: ExportFormat) -> Result<String, RenderError> {
        match format {
            ExportFormat::Markdown => render_markdown(clippings, &self.options.markdown),
            ExportFormat::Html => self.pages.render_clippings(clippings, self.options.minify),
            ExportFormat::Json => Ok(serde_json::to_string_pretty(clippings)?),
        }
    }

    /// Convert every notebook export under `input_dir` into `output_dir`.
    ///
    /// The directory structure is mirrored. Files that fail to convert are
    /// reported in the summary and do not stop the rest of the batch. When
    /// `output_dir` lies inside `input_dir` its contents are not treated as
    /// inputs, and an output that would land on its own input is refused.
    pub fn export_dir(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        format: ExportFormat,
    ) -> Result<ExportSummary, ExportError> {
        let start = Instant::now();

        if !input_dir.is_dir() {
            return Err(ExportError::MissingInput(input_dir.to_path_buf()));
        }

        let inputs = discover_inputs(input_dir, output_dir);
        tracing::info!(
            "Found {} notebook exports in {}",
            inputs.len(),
            input_dir.display()
        );

        let results: Vec<(PathBuf, Result<usize, String>)> = inputs
            .par_iter()
            .map(|path| {
                let result = self
                    .export_file(path, input_dir, output_dir, format)
                    .map_err(|e| e.to_string());
                (path.clone(), result)
            })
            .collect();

        let mut summary = ExportSummary::default();
        for (path, result) in results {
            match result {
                Ok(items) => {
                    summary.converted += 1;
                    summary.items += items;
                }
                Err(message) => {
                    tracing::warn!("Failed to convert {}: {}", path.display(), message);
                    summary.failed.push((path, message));
                }
            }
        }

        summary.duration_ms = start.elapsed().as_millis() as u64;
        Ok(summary)
    }

    /// Convert one file, returning the number of items written.
    fn export_file(
        &self,
        path: &Path,
        input_dir: &Path,
        output_dir: &Path,
        format: ExportFormat,
    ) -> Result<usize, ExportError> {
        let output_path = output_path(path, input_dir, output_dir, format);
        if output_path == path || is_same_file(path, &output_path) {
            return Err(ExportError::OverwritesInput(path.to_path_buf()));
        }

        let clippings = extract_file(path)?;
        let rendered = self.render(&clippings, format)?;

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|source| ExportError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&output_path, rendered).map_err(|source| ExportError::Write {
            path: output_path.clone(),
            source,
        })?;

        tracing::debug!(
            "Wrote {} items to {}",
            clippings.items.len(),
            output_path.display()
        );

        Ok(clippings.items.len())
    }
}

/// Find all notebook exports below `input_dir`, in a stable order.
///
/// A distinct `output_dir` nested inside `input_dir` is pruned so earlier
/// outputs are never picked up as inputs.
fn discover_inputs(input_dir: &Path, output_dir: &Path) -> Vec<PathBuf> {
    let output_root = fs::canonicalize(output_dir)
        .ok()
        .filter(|out| fs::canonicalize(input_dir).map_or(true, |input| &input != out));

    let mut inputs: Vec<PathBuf> = WalkDir::new(input_dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| match &output_root {
            Some(out) if entry.file_type().is_dir() => {
                fs::canonicalize(entry.path()).map_or(true, |dir| &dir != out)
            }
            _ => true,
        })
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|path| path.is_file() && is_supported_input(path))
        .collect();

    inputs.sort();
    inputs
}

/// Whether two paths resolve to the same existing file.
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Output path mirroring the input's position below `input_dir`.
fn output_path(path: &Path, input_dir: &Path, output_dir: &Path, format: ExportFormat) -> PathBuf {
    let relative = path.strip_prefix(input_dir).unwrap_or(path);
    output_dir.join(relative).with_extension(format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clippings_core::{NoteItem, NoteKind};
    use tempfile::tempdir;

    const NOTEBOOK: &str = r#"<html><body>
<div class="bookTitle">Walden</div>
<div class="authors">Thoreau, Henry David</div>
<div class="sectionHeading">Economy</div>
<div class="noteHeading">Highlight (yellow) - Location 120</div>
<div class="noteText">I went to the woods because I wished to live deliberately.</div>
</body></html>"#;

    fn exporter() -> Exporter {
        Exporter::new(ExportOptions::default()).unwrap()
    }

    #[test]
    fn parses_formats() {
        assert_eq!("markdown".parse::<ExportFormat>(), Ok(ExportFormat::Markdown));
        assert_eq!("MD".parse::<ExportFormat>(), Ok(ExportFormat::Markdown));
        assert_eq!("html".parse::<ExportFormat>(), Ok(ExportFormat::Html));
        assert_eq!("json".parse::<ExportFormat>(), Ok(ExportFormat::Json));
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn renders_json() {
        let clippings = Clippings {
            items: vec![NoteItem {
                section: String::new(),
                metadata: "Page 1".to_string(),
                text: "Text".to_string(),
                kind: NoteKind::Note,
            }],
            ..Default::default()
        };

        let json = exporter().render(&clippings, ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["title"], "Unknown Title");
        assert_eq!(value["items"][0]["type"], "note");
    }

    #[test]
    fn exports_directory() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();

        fs::create_dir_all(input.path().join("nested")).unwrap();
        fs::write(input.path().join("walden.html"), NOTEBOOK).unwrap();
        fs::write(input.path().join("nested").join("copy.htm"), NOTEBOOK).unwrap();
        fs::write(input.path().join("readme.txt"), "not a notebook").unwrap();

        let summary = exporter()
            .export_dir(input.path(), output.path(), ExportFormat::Markdown)
            .unwrap();

        assert_eq!(summary.converted, 2);
        assert_eq!(summary.items, 2);
        assert!(summary.failed.is_empty());

        let md = fs::read_to_string(output.path().join("walden.md")).unwrap();
        assert!(md.starts_with("# Walden\n*Thoreau, Henry David*\n\n## Economy\n\n"));
        assert!(output.path().join("nested").join("copy.md").exists());
        assert!(!output.path().join("readme.md").exists());
    }

    #[test]
    fn records_failures_without_aborting() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();

        fs::write(input.path().join("good.html"), NOTEBOOK).unwrap();
        fs::write(input.path().join("bad.html"), NOTEBOOK).unwrap();
        // A directory where bad.md should go makes that write fail
        fs::create_dir(output.path().join("bad.md")).unwrap();

        let summary = exporter()
            .export_dir(input.path(), output.path(), ExportFormat::Markdown)
            .unwrap();

        assert_eq!(summary.converted, 1);
        assert_eq!(summary.failed.len(), 1);
        assert!(summary.failed[0].0.ends_with("bad.html"));
        assert!(output.path().join("good.md").exists());
    }

    #[test]
    fn refuses_to_overwrite_inputs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("walden.html");
        fs::write(&path, NOTEBOOK).unwrap();

        let summary = exporter()
            .export_dir(dir.path(), dir.path(), ExportFormat::Html)
            .unwrap();

        assert_eq!(summary.converted, 0);
        assert_eq!(summary.failed.len(), 1);
        assert!(summary.failed[0].1.contains("Refusing to overwrite"));
        assert_eq!(fs::read_to_string(&path).unwrap(), NOTEBOOK);
    }

    #[test]
    fn skips_outputs_nested_in_input_dir() {
        let input = tempdir().unwrap();
        let output = input.path().join("previews");
        fs::write(input.path().join("walden.html"), NOTEBOOK).unwrap();

        let first = exporter()
            .export_dir(input.path(), &output, ExportFormat::Html)
            .unwrap();
        let second = exporter()
            .export_dir(input.path(), &output, ExportFormat::Html)
            .unwrap();

        assert_eq!(first.converted, 1);
        assert_eq!(second.converted, 1);
        assert!(second.failed.is_empty());
        assert!(output.join("walden.html").exists());
        assert!(!output.join("previews").exists());
    }

    #[test]
    fn exports_into_input_dir_with_another_format() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("walden.html"), NOTEBOOK).unwrap();

        let summary = exporter()
            .export_dir(dir.path(), dir.path(), ExportFormat::Markdown)
            .unwrap();

        assert_eq!(summary.converted, 1);
        assert!(dir.path().join("walden.md").exists());
    }

    #[test]
    fn errors_on_missing_input_dir() {
        let output = tempdir().unwrap();

        let result = exporter().export_dir(
            Path::new("/definitely/missing/notebooks"),
            output.path(),
            ExportFormat::Markdown,
        );

        assert!(matches!(result, Err(ExportError::MissingInput(_))));
    }
}
