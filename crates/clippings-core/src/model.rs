//! Extracted notebook data.

use serde::{Deserialize, Serialize};

/// Title used when the export has no book title element.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Author line used when the export has no authors element.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Whether an item is a verbatim excerpt or a reader annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    /// Excerpt captured from the book
    #[default]
    Highlight,
    /// Annotation written by the reader
    Note,
}

impl NoteKind {
    /// Lowercase name, as used in CSS classes and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Highlight => "highlight",
            Self::Note => "note",
        }
    }
}

/// A single highlight or note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteItem {
    /// Most recent section heading seen before this item (may be empty)
    pub section: String,

    /// Location info from the note heading, e.g. "Page 5 · Location 70"
    pub metadata: String,

    /// Trimmed body text, line breaks preserved
    pub text: String,

    /// Highlight or note
    #[serde(rename = "type")]
    pub kind: NoteKind,
}

/// Everything extracted from one notebook export.
///
/// Produced in one pass by [`crate::extract`]. Callers holding a `Clippings`
/// replace it when a new export arrives; two extractions are never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clippings {
    /// Book title
    pub title: String,

    /// Comma separated author names
    pub authors: String,

    /// Items in document order
    pub items: Vec<NoteItem>,
}

impl Clippings {
    /// Number of items of the given kind.
    pub fn count(&self, kind: NoteKind) -> usize {
        self.items.iter().filter(|item| item.kind == kind).count()
    }
}

impl Default for Clippings {
    fn default() -> Self {
        Self {
            title: UNKNOWN_TITLE.to_string(),
            authors: UNKNOWN_AUTHOR.to_string(),
            items: Vec::new(),
        }
    }
}
