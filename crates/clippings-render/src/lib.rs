//! Renderers for extracted Kindle clippings.
//!
//! Produces an HTML fragment for preview, a Markdown document for export,
//! and a standalone preview page wrapping the fragment.

pub mod assets;
pub mod error;
pub mod export;
pub mod html;
pub mod markdown;
pub mod page;
pub mod sections;

pub use error::{ExportError, RenderError};
pub use export::{ExportFormat, ExportOptions, ExportSummary, Exporter};
pub use html::render_html;
pub use markdown::{render_markdown, MarkdownOptions};
pub use page::{PageContext, PageRenderer};
pub use sections::{section_label, walk_sections, SectionVisitor};
