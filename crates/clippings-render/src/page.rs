//! Standalone preview page.

use clippings_core::Clippings;
use minijinja::{context, Environment};

use crate::assets::preview_css;
use crate::error::RenderError;
use crate::html::render_html;

/// Context for rendering the preview page.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct PageContext {
    /// Document title, also the browser tab title
    pub title: String,
    /// Author line, published as `<meta name="author">`
    pub authors: String,
    /// Rendered `<article>` fragment
    pub content: String,
    /// Inline stylesheet
    pub styles: String,
    /// Extra script appended to the body (live reload)
    pub script: Option<String>,
}

impl PageContext {
    /// Build a page context for extracted clippings.
    pub fn for_clippings(clippings: &Clippings, minify: bool) -> Result<Self, RenderError> {
        Ok(Self {
            title: clippings.title.clone(),
            authors: clippings.authors.clone(),
            content: render_html(clippings),
            styles: preview_css(minify)?,
            script: None,
        })
    }
}

/// Template engine using minijinja.
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    /// Create a page renderer with the built-in template.
    pub fn new() -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.add_template_owned("page.html".to_string(), PAGE_TEMPLATE.to_string())?;

        Ok(Self { env })
    }

    /// Render a full HTML page.
    pub fn render(&self, context: &PageContext) -> Result<String, RenderError> {
        let tmpl = self.env.get_template("page.html")?;

        let html = tmpl.render(context! {
            title => &context.title,
            authors => &context.authors,
            content => &context.content,
            styles => &context.styles,
            script => &context.script,
        })?;

        Ok(html)
    }

    /// Render the preview page for extracted clippings.
    pub fn render_clippings(
        &self,
        clippings: &Clippings,
        minify: bool,
    ) -> Result<String, RenderError> {
        self.render(&PageContext::for_clippings(clippings, minify)?)
    }
}

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <meta name="author" content="{{ authors }}">
  <title>{{ title }}</title>
  <style>{{ styles | safe }}</style>
</head>
<body>
  <main>
    {{ content | safe }}
  </main>
  {% if script %}<script>{{ script | safe }}</script>
  {% endif %}
</body>
</html>"##;

#[cfg(test)]
mod tests {
    use super::*;
    use clippings_core::{NoteItem, NoteKind};

    fn clippings() -> Clippings {
        Clippings {
            title: "Dune".to_string(),
            authors: "Herbert, Frank".to_string(),
            items: vec![NoteItem {
                section: "1".to_string(),
                metadata: "Location 10".to_string(),
                text: "Fear is the mind-killer.".to_string(),
                kind: NoteKind::Highlight,
            }],
        }
    }

    #[test]
    fn renders_page_metadata() {
        let renderer = PageRenderer::new().unwrap();

        let html = renderer.render_clippings(&clippings(), false).unwrap();

        assert!(html.contains("<title>Dune</title>"));
        assert!(html.contains(r#"<meta name="author" content="Herbert, Frank">"#));
        assert!(html.contains("<blockquote><p>Fear is the mind-killer.</p></blockquote>"));
        assert!(html.contains(".clip-highlight"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn escapes_metadata_in_head() {
        let renderer = PageRenderer::new().unwrap();
        let context = PageContext {
            title: "</title><script>x</script>".to_string(),
            authors: "\"quoted\"".to_string(),
            ..Default::default()
        };

        let html = renderer.render(&context).unwrap();

        assert!(!html.contains("<script>x</script>"));
        assert!(!html.contains("content=\"\"quoted\"\""));
    }

    #[test]
    fn includes_script_when_present() {
        let renderer = PageRenderer::new().unwrap();
        let context = PageContext {
            title: "Live".to_string(),
            script: Some("console.log('live')".to_string()),
            ..Default::default()
        };

        let html = renderer.render(&context).unwrap();

        assert!(html.contains("<script>console.log('live')</script>"));
    }
}
