//! Sectioned traversal shared by the renderers.

use std::borrow::Cow;

use clippings_core::NoteItem;

/// Receives section headings and items from [`walk_sections`].
pub trait SectionVisitor {
    /// Called before the first item of a new non-empty section.
    fn section(&mut self, label: &str);

    /// Called for every item, with its position in the item list.
    fn item(&mut self, index: usize, item: &NoteItem);
}

/// Walk items in order, announcing each change of section.
///
/// A heading is announced at most once per run of consecutive items sharing
/// the same section. Items with an empty section never announce a heading
/// and leave the last announced section untouched.
pub fn walk_sections<V: SectionVisitor>(items: &[NoteItem], visitor: &mut V) {
    let mut last_section: Option<&str> = None;

    for (index, item) in items.iter().enumerate() {
        if !item.section.is_empty() && last_section != Some(item.section.as_str()) {
            visitor.section(&section_label(&item.section));
            last_section = Some(item.section.as_str());
        }

        visitor.item(index, item);
    }
}

/// Display label for a section: numeric sections become `Chapter <n>`.
pub fn section_label(section: &str) -> Cow<'_, str> {
    if is_numeric(section) {
        Cow::Owned(format!("Chapter {}", section))
    } else {
        Cow::Borrowed(section)
    }
}

/// Number-like text: decimal and exponent literals, `Infinity` with an
/// optional sign, and unsigned `0x`/`0o`/`0b` integer literals.
fn is_numeric(text: &str) -> bool {
    let text = text.trim();
    if matches!(text, "Infinity" | "+Infinity" | "-Infinity") || is_radix_integer(text) {
        return true;
    }

    // Rust also parses "inf" and "nan" spellings, which are labels here
    !text.is_empty()
        && text
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
        && text.parse::<f64>().is_ok()
}

fn is_radix_integer(text: &str) -> bool {
    let radix = match text.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => return false,
    };
    let digits = &text[2..];

    !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix))
}
