//! HTML preview fragment.

use clippings_core::{Clippings, NoteItem, NoteKind};
use html_escape::encode_text;

use crate::sections::{walk_sections, SectionVisitor};

/// Per-item stagger step and cap for the fade-in animation, in hundredths of a second.
const DELAY_STEP: usize = 5;
const DELAY_MAX: usize = 150;

/// Render clippings as an `<article>` fragment.
///
/// All text taken from the export is HTML-escaped.
pub fn render_html(clippings: &Clippings) -> String {
    let mut writer = HtmlWriter {
        out: String::from("<article>\n"),
    };

    writer.out.push_str(&format!(
        "  <h1 class=\"book-title\">{}</h1>\n",
        encode_text(&clippings.title)
    ));
    writer.out.push_str(&format!(
        "  <p class=\"book-authors\">{}</p>\n\n",
        encode_text(&clippings.authors)
    ));

    walk_sections(&clippings.items, &mut writer);

    writer.out.push_str("</article>");
    writer.out
}

struct HtmlWriter {
    out: String,
}

impl SectionVisitor for HtmlWriter {
    fn section(&mut self, label: &str) {
        self.out.push_str(&format!(
            "  <h2 class=\"section-title\">{}</h2>\n",
            encode_text(label)
        ));
    }

    fn item(&mut self, index: usize, item: &NoteItem) {
        let delay = animation_delay(index);
        let text = encode_text(&item.text);

        self.out.push_str(&format!(
            "  <div class=\"clip-{}\" style=\"animation-delay: {}s\">\n",
            item.kind.as_str(),
            delay
        ));
        let body = match item.kind {
            NoteKind::Highlight => format!("    <blockquote><p>{}</p></blockquote>\n", text),
            NoteKind::Note => format!("    <p><strong>Note:</strong> {}</p>\n", text),
        };
        self.out.push_str(&body);
        self.out.push_str(&format!(
            "    <cite>{}</cite>\n",
            encode_text(&item.metadata)
        ));
        self.out.push_str("  </div>\n");
    }
}

/// Animation delay in seconds for the item at `index`.
fn animation_delay(index: usize) -> f64 {
    let hundredths = index.saturating_mul(DELAY_STEP).min(DELAY_MAX);
    hundredths as f64 / 100.0
}
