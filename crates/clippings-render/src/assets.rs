//! Stylesheet for the preview page.

use crate::error::RenderError;

/// Minify CSS using lightningcss.
pub fn minify_css(css: &str) -> Result<String, RenderError> {
    use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

    let stylesheet = StyleSheet::parse(css, ParserOptions::default())
        .map_err(|e| RenderError::Css(format!("parse error: {}", e)))?;

    let minified = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..Default::default()
        })
        .map_err(|e| RenderError::Css(format!("minify error: {}", e)))?;

    Ok(minified.code)
}

/// Preview stylesheet, optionally minified.
pub fn preview_css(minify: bool) -> Result<String, RenderError> {
    if minify {
        minify_css(PREVIEW_CSS)
    } else {
        Ok(PREVIEW_CSS.to_string())
    }
}

/// Reading-view theme for the `<article>` fragment produced by [`crate::render_html`].
pub const PREVIEW_CSS: &str = r#"/* Clippings preview theme */

:root {
  --background: #faf8f5;
  --foreground: #2b2a28;
  --muted: #6f6b64;
  --accent: #c98a2b;
  --note: #3f6fb5;
  --content-max-width: 760px;
}

@media (prefers-color-scheme: dark) {
  :root {
    --background: #1c1b1a;
    --foreground: #e8e4dc;
    --muted: #a39e94;
    --accent: #e0a850;
    --note: #7ea6e0;
  }
}

* {
  box-sizing: border-box;
}

body {
  margin: 0;
  font-family: Georgia, "Iowan Old Style", serif;
  background: var(--background);
  color: var(--foreground);
  line-height: 1.65;
}

main {
  max-width: var(--content-max-width);
  margin: 0 auto;
  padding: 3rem 1.5rem 4rem;
}

.book-title {
  font-size: 2.25rem;
  line-height: 1.2;
  margin: 0 0 0.5rem;
}

.book-authors {
  color: var(--muted);
  font-style: italic;
  margin: 0 0 2.5rem;
}

.section-title {
  font-size: 1.4rem;
  margin: 2.5rem 0 1rem;
  padding-bottom: 0.25rem;
  border-bottom: 1px solid var(--muted);
}

.clip-highlight,
.clip-note {
  margin: 0 0 1.5rem;
  opacity: 0;
  animation: clip-in 0.4s ease-out forwards;
}

.clip-highlight blockquote {
  margin: 0;
  padding: 0.25rem 0 0.25rem 1rem;
  border-left: 3px solid var(--accent);
}

.clip-highlight p,
.clip-note p {
  margin: 0;
  white-space: pre-wrap;
}

.clip-note {
  padding: 0.75rem 1rem;
  border-left: 3px solid var(--note);
  background: rgba(63, 111, 181, 0.08);
}

cite {
  display: block;
  margin-top: 0.35rem;
  color: var(--muted);
  font-size: 0.85rem;
}

.empty {
  color: var(--muted);
  text-align: center;
  margin-top: 6rem;
}

@keyframes clip-in {
  from {
    opacity: 0;
    transform: translateY(6px);
  }
  to {
    opacity: 1;
    transform: translateY(0);
  }
}
"#;
