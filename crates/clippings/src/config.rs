//! Configuration file (clippings.toml).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clippings_render::ExportFormat;
use serde::Deserialize;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub preview: PreviewSettings,
    #[serde(default)]
    pub serve: ServeSettings,
}

#[derive(Debug, Deserialize)]
pub struct ExportSettings {
    #[serde(default)]
    pub format: ExportFormat,
    /// Prepend YAML frontmatter to Markdown exports
    #[serde(default)]
    pub frontmatter: bool,
    /// Output directory for batch exports
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

#[derive(Debug, Deserialize)]
pub struct PreviewSettings {
    #[serde(default = "default_true")]
    pub minify: bool,
}

#[derive(Debug, Deserialize)]
pub struct ServeSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_true")]
    pub open: bool,
}

fn default_output_dir() -> String {
    "notes".to_string()
}
fn default_true() -> bool {
    true
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    7878
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            frontmatter: false,
            output_dir: default_output_dir(),
        }
    }
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            minify: default_true(),
        }
    }
}

impl Default for ServeSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            open: default_true(),
        }
    }
}

/// Load configuration if the file exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile =
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Default config written by `clippings init`.
pub const DEFAULT_CONFIG: &str = r#"# Clippings configuration

[export]
# Output format: markdown, html or json
format = "markdown"

# Prepend YAML frontmatter (title, author) to Markdown exports
frontmatter = false

# Output directory for `clippings batch`
output_dir = "notes"

[preview]
# Minify the stylesheet embedded in preview pages
minify = true

[serve]
host = "127.0.0.1"
port = 7878
open = true
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() {
        let config = load_config(Path::new("/definitely/missing/clippings.toml")).unwrap();

        assert_eq!(config.export.format, ExportFormat::Markdown);
        assert_eq!(config.export.output_dir, "notes");
        assert!(config.preview.minify);
        assert_eq!(config.serve.port, 7878);
    }

    #[test]
    fn default_config_parses() {
        let config: ConfigFile = toml::from_str(DEFAULT_CONFIG).unwrap();

        assert_eq!(config.serve.host, "127.0.0.1");
        assert!(config.serve.open);
        assert!(!config.export.frontmatter);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("clippings.toml");
        fs::write(&path, "[export]\nformat = \"json\"\n").unwrap();

        let config = load_config(&path).unwrap();

        assert_eq!(config.export.format, ExportFormat::Json);
        assert_eq!(config.export.output_dir, "notes");
        assert_eq!(config.serve.port, 7878);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("clippings.toml");
        fs::write(&path, "[export\nformat = ").unwrap();

        assert!(load_config(&path).is_err());
    }
}
