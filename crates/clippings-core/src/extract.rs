//! Notebook export extraction.

use std::fs;
use std::path::Path;

use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractError;
use crate::heading::{normalize_authors, NoteHeading};
use crate::model::{Clippings, NoteItem, UNKNOWN_AUTHOR, UNKNOWN_TITLE};

const TITLE_SELECTOR: &str = ".bookTitle";
const AUTHORS_SELECTOR: &str = ".authors";
const ENTRY_SELECTOR: &str = ".sectionHeading, .noteHeading, .noteText";

const SECTION_HEADING: &str = "sectionHeading";
const NOTE_HEADING: &str = "noteHeading";
const NOTE_TEXT: &str = "noteText";

/// Carry-over state for the single forward pass over entries.
#[derive(Debug, Default)]
struct ExtractState {
    section: String,
    note_heading: String,
}

impl ExtractState {
    /// Apply one entry element, returning an item for note bodies.
    fn apply(&mut self, element: ElementRef<'_>) -> Option<NoteItem> {
        let has_class = |name: &str| element.value().classes().any(|c| c == name);

        if has_class(SECTION_HEADING) {
            self.section = trimmed_text(element);
            None
        } else if has_class(NOTE_HEADING) {
            self.note_heading = trimmed_text(element);
            None
        } else if has_class(NOTE_TEXT) {
            let heading = NoteHeading::classify(&self.note_heading);
            Some(NoteItem {
                section: self.section.clone(),
                metadata: heading.metadata,
                text: trimmed_text(element),
                kind: heading.kind,
            })
        } else {
            None
        }
    }
}

/// Check whether a path looks like a Kindle HTML export.
pub fn is_supported_input(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
        .unwrap_or(false)
}

/// Read and extract a notebook export from disk.
///
/// The input kind is checked before anything is read. Bytes that are not
/// valid UTF-8 are replaced with U+FFFD rather than failing the file.
pub fn extract_file(path: &Path) -> Result<Clippings, ExtractError> {
    if !is_supported_input(path) {
        return Err(ExtractError::UnsupportedInput {
            path: path.to_path_buf(),
        });
    }

    let bytes = fs::read(path).map_err(|source| ExtractError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());

    extract(&String::from_utf8_lossy(&bytes))
}

/// Extract title, authors and note items from notebook export HTML.
///
/// Never fails on missing elements: absent title and authors fall back to
/// defaults, and a document without entries yields no items.
pub fn extract(html: &str) -> Result<Clippings, ExtractError> {
    let document = Html::parse_document(html);

    let title = first_text(&document, TITLE_SELECTOR)?
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

    let raw_authors = first_text(&document, AUTHORS_SELECTOR)?
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
    let authors = normalize_authors(&raw_authors);

    let entries = selector(ENTRY_SELECTOR)?;
    let mut state = ExtractState::default();
    let items: Vec<NoteItem> = document
        .select(&entries)
        .filter_map(|element| state.apply(element))
        .collect();

    tracing::debug!(
        "Extracted {} items from \"{}\" by {}",
        items.len(),
        title,
        authors
    );

    Ok(Clippings {
        title,
        authors,
        items,
    })
}

fn selector(source: &str) -> Result<Selector, ExtractError> {
    Selector::parse(source).map_err(|e| ExtractError::Selector {
        selector: source.to_string(),
        message: format!("{:?}", e),
    })
}

fn first_text(document: &Html, source: &str) -> Result<Option<String>, ExtractError> {
    let selector = selector(source)?;
    Ok(document.select(&selector).next().map(trimmed_text))
}

fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
