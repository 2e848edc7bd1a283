//! Extraction errors.

use std::path::PathBuf;

/// Errors that can occur when extracting a notebook export.
///
/// Missing title, authors or headings are not errors; they fall back to defaults.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Unsupported input {}: expected a Kindle HTML export (.html or .htm)", path.display())]
    UnsupportedInput { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid selector {selector}: {message}")]
    Selector { selector: String, message: String },
}
