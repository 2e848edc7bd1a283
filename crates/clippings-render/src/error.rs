//! Rendering and export errors.

use std::path::PathBuf;

use clippings_core::ExtractError;

/// Errors that can occur while rendering a single document.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to render template: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Failed to serialize frontmatter: {0}")]
    Frontmatter(#[from] serde_yaml::Error),

    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to process stylesheet: {0}")]
    Css(String),
}

/// Errors that can occur while exporting a directory.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Input directory not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("Refusing to overwrite input {}", .0.display())]
    OverwritesInput(PathBuf),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
