//! Kindle notebook export parser.
//!
//! This crate turns the HTML notebook that Kindle exports for a book into a
//! title, a normalized author line, and an ordered list of highlights and notes.

pub mod error;
pub mod extract;
pub mod heading;
pub mod model;

pub use error::ExtractError;
pub use extract::{extract, extract_file, is_supported_input};
pub use heading::{normalize_authors, NoteHeading};
pub use model::{Clippings, NoteItem, NoteKind, UNKNOWN_AUTHOR, UNKNOWN_TITLE};
