//! Markdown export.

use clippings_core::{Clippings, NoteItem, NoteKind};
use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::sections::{walk_sections, SectionVisitor};

/// Options for the Markdown export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MarkdownOptions {
    /// Prepend a YAML frontmatter block with title and author
    #[serde(default)]
    pub frontmatter: bool,
}

/// Frontmatter written ahead of the document, for note-taking apps.
#[derive(Debug, Serialize)]
struct Frontmatter<'a> {
    title: &'a str,
    author: &'a str,
}

/// Render clippings as a Markdown document.
pub fn render_markdown(
    clippings: &Clippings,
    options: &MarkdownOptions,
) -> Result<String, RenderError> {
    let mut writer = MarkdownWriter { out: String::new() };

    if options.frontmatter {
        let yaml = serde_yaml::to_string(&Frontmatter {
            title: &clippings.title,
            author: &clippings.authors,
        })?;
        writer.out.push_str(&format!("---\n{}---\n\n", yaml));
    }

    writer.out.push_str(&format!(
        "# {}\n*{}*\n\n",
        clippings.title, clippings.authors
    ));

    walk_sections(&clippings.items, &mut writer);

    Ok(writer.out)
}

struct MarkdownWriter {
    out: String,
}

impl SectionVisitor for MarkdownWriter {
    fn section(&mut self, label: &str) {
        self.out.push_str(&format!("## {}\n\n", label));
    }

    fn item(&mut self, _index: usize, item: &NoteItem) {
        match item.kind {
            NoteKind::Highlight => {
                let quoted = item
                    .text
                    .split('\n')
                    .map(|line| format!("> {}", line))
                    .collect::<Vec<_>>()
                    .join("\n");
                self.out
                    .push_str(&format!("{}\n*{}*\n\n", quoted, item.metadata));
            }
            NoteKind::Note => {
                self.out.push_str(&format!(
                    "**Note:** {}\n*{}*\n\n",
                    item.text, item.metadata
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pulldown_cmark::{Event, HeadingLevel, Parser, Tag};

    fn item(section: &str, kind: NoteKind, text: &str, metadata: &str) -> NoteItem {
        NoteItem {
            section: section.to_string(),
            metadata: metadata.to_string(),
            text: text.to_string(),
            kind,
        }
    }

    fn book(items: Vec<NoteItem>) -> Clippings {
        Clippings {
            title: "Book".to_string(),
            authors: "A, B".to_string(),
            items,
        }
    }

    #[test]
    fn renders_quoted_highlight() {
        let clippings = book(vec![item(
            "1",
            NoteKind::Highlight,
            "Hello\nWorld",
            "Location 10",
        )]);

        let md = render_markdown(&clippings, &MarkdownOptions::default()).unwrap();

        assert_eq!(
            md,
            "# Book\n*A, B*\n\n## Chapter 1\n\n> Hello\n> World\n*Location 10*\n\n"
        );
    }

    #[test]
    fn renders_note() {
        let clippings = book(vec![item("", NoteKind::Note, "My thought", "Page 5")]);

        let md = render_markdown(&clippings, &MarkdownOptions::default()).unwrap();

        assert_eq!(md, "# Book\n*A, B*\n\n**Note:** My thought\n*Page 5*\n\n");
    }

    #[test]
    fn renders_repeated_section_once() {
        let clippings = book(vec![
            item("Intro", NoteKind::Highlight, "a", "Location 1"),
            item("Intro", NoteKind::Note, "b", "Location 2"),
        ]);

        let md = render_markdown(&clippings, &MarkdownOptions::default()).unwrap();

        assert_eq!(md.matches("## Intro").count(), 1);
    }

    #[test]
    fn renders_empty_document() {
        let md = render_markdown(&Clippings::default(), &MarkdownOptions::default()).unwrap();

        assert_eq!(md, "# Unknown Title\n*Unknown Author*\n\n");
    }

    #[test]
    fn prepends_frontmatter() {
        let clippings = book(vec![]);
        let options = MarkdownOptions { frontmatter: true };

        let md = render_markdown(&clippings, &options).unwrap();

        assert!(md.starts_with("---\ntitle: Book\n"));
        assert!(md.contains("author:"));
        assert!(md.contains("\n---\n\n# Book\n*A, B*\n\n"));
    }

    #[test]
    fn output_parses_as_expected_markdown() {
        let clippings = book(vec![
            item("Intro", NoteKind::Highlight, "First line\nSecond line", "Page 1"),
            item("2", NoteKind::Note, "A note", "Page 2"),
        ]);

        let md = render_markdown(&clippings, &MarkdownOptions::default()).unwrap();

        let mut headings = Vec::new();
        let mut blockquotes = 0;
        let mut current_heading: Option<(HeadingLevel, String)> = None;

        for event in Parser::new(&md) {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    current_heading = Some((level, String::new()));
                }
                Event::Text(text) => {
                    if let Some((_, ref mut heading)) = current_heading {
                        heading.push_str(&text);
                    }
                }
                Event::End(pulldown_cmark::TagEnd::Heading(_)) => {
                    if let Some(heading) = current_heading.take() {
                        headings.push(heading);
                    }
                }
                Event::Start(Tag::BlockQuote(_)) => blockquotes += 1,
                _ => {}
            }
        }

        assert_eq!(
            headings,
            vec![
                (HeadingLevel::H1, "Book".to_string()),
                (HeadingLevel::H2, "Intro".to_string()),
                (HeadingLevel::H2, "Chapter 2".to_string()),
            ]
        );
        assert_eq!(blockquotes, 1);
    }
}
