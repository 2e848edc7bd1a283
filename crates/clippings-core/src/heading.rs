//! Note heading classification and author normalization.

use crate::model::NoteKind;

/// Classification of a note heading such as `Highlight (yellow) - Page 5 · Location 70`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteHeading {
    /// Highlight or note
    pub kind: NoteKind,
    /// Heading text after the leading label
    pub metadata: String,
}

impl NoteHeading {
    /// Classify a note heading.
    ///
    /// A heading is a note when it contains `note -` in any case. The metadata
    /// is everything after the first `-`, trimmed, or the whole heading when it
    /// has no `-`.
    pub fn classify(heading: &str) -> Self {
        let kind = if heading.to_lowercase().contains("note -") {
            NoteKind::Note
        } else {
            NoteKind::Highlight
        };

        let metadata = match heading.split_once('-') {
            Some((_, rest)) => rest.trim(),
            None => heading.trim(),
        };

        Self {
            kind,
            metadata: metadata.to_string(),
        }
    }
}

/// Normalize a raw authors line.
///
/// Kindle separates multiple authors with `;`. Parts are trimmed, empty parts
/// dropped, and the rest joined with `", "`.
pub fn normalize_authors(raw: &str) -> String {
    raw.split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_highlight() {
        let heading = NoteHeading::classify("Highlight - Page 5");

        assert_eq!(heading.kind, NoteKind::Highlight);
        assert_eq!(heading.metadata, "Page 5");
    }

    #[test]
    fn classifies_note() {
        let heading = NoteHeading::classify("Note - Page 5");

        assert_eq!(heading.kind, NoteKind::Note);
        assert_eq!(heading.metadata, "Page 5");
    }

    #[test]
    fn note_detection_ignores_case() {
        assert_eq!(NoteHeading::classify("NOTE - Location 12").kind, NoteKind::Note);
        assert_eq!(NoteHeading::classify("note - Location 12").kind, NoteKind::Note);
        assert_eq!(
            NoteHeading::classify("Notebook entry - Location 12").kind,
            NoteKind::Highlight
        );
    }

    #[test]
    fn keeps_later_dashes_in_metadata() {
        let heading = NoteHeading::classify("Highlight (yellow) - Page 5 - Location 70-72");

        assert_eq!(heading.metadata, "Page 5 - Location 70-72");
    }

    #[test]
    fn uses_whole_heading_without_dash() {
        let heading = NoteHeading::classify("  Bookmark at Location 40 ");

        assert_eq!(heading.kind, NoteKind::Highlight);
        assert_eq!(heading.metadata, "Bookmark at Location 40");
    }

    #[test]
    fn empty_heading_is_a_highlight_without_metadata() {
        let heading = NoteHeading::classify("");

        assert_eq!(heading.kind, NoteKind::Highlight);
        assert_eq!(heading.metadata, "");
    }

    #[test]
    fn normalizes_authors() {
        assert_eq!(normalize_authors("Smith, Jane; Doe, John"), "Smith, Jane, Doe, John");
        assert_eq!(normalize_authors(" A ;; B ; "), "A, B");
        assert_eq!(normalize_authors("Single Author"), "Single Author");
        assert_eq!(normalize_authors(" ; ; "), "");
    }
}
