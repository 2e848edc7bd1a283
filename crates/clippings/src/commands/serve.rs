//! Live preview server command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clippings_render::MarkdownOptions;
use clippings_server::{PreviewServer, PreviewServerConfig};

use crate::config::load_config;

/// Run the preview server.
pub async fn run(
    config_path: &Path,
    input: Option<PathBuf>,
    port: Option<u16>,
    open: bool,
) -> Result<()> {
    let config = load_config(config_path)?;

    let port = port.unwrap_or(config.serve.port);
    match &input {
        Some(path) => tracing::info!("Previewing {} on port {}", path.display(), port),
        None => tracing::info!("Waiting for an upload on port {}", port),
    }

    let server_config = PreviewServerConfig {
        input,
        port,
        host: config.serve.host,
        open: open && config.serve.open,
        minify: config.preview.minify,
        markdown: MarkdownOptions {
            frontmatter: config.export.frontmatter,
        },
    };

    PreviewServer::new(server_config).start().await?;

    Ok(())
}
