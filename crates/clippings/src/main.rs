//! Clippings CLI - convert Kindle notebook exports to Markdown and HTML.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clippings_render::ExportFormat;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "clippings")]
#[command(about = "Convert Kindle notebook exports to Markdown and HTML previews")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to clippings.toml config file
    #[arg(short, long, default_value = "clippings.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one notebook export
    Export {
        /// Kindle HTML export (.html or .htm)
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: markdown, html or json
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Prepend YAML frontmatter to Markdown output
        #[arg(long)]
        frontmatter: bool,
    },

    /// Convert every notebook export in a directory
    Batch {
        /// Directory containing Kindle HTML exports
        dir: PathBuf,

        /// Output directory (defaults to config or "notes")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: markdown, html or json
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Prepend YAML frontmatter to Markdown output
        #[arg(long)]
        frontmatter: bool,
    },

    /// Write a standalone HTML preview page
    Preview {
        /// Kindle HTML export (.html or .htm)
        input: PathBuf,

        /// Output file (defaults to <input>.preview.html)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip stylesheet minification
        #[arg(long)]
        no_minify: bool,
    },

    /// Start the live preview server
    Serve {
        /// Kindle HTML export to load and watch
        input: Option<PathBuf>,

        /// Port to listen on (defaults to config or 7878)
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Write a default clippings.toml
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stderr keeps stdout free for exports
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Export {
            input,
            output,
            format,
            frontmatter,
        } => {
            commands::export::run(&cli.config, input, output, format, frontmatter).await?;
        }
        Commands::Batch {
            dir,
            output,
            format,
            frontmatter,
        } => {
            commands::batch::run(&cli.config, dir, output, format, frontmatter).await?;
        }
        Commands::Preview {
            input,
            output,
            no_minify,
        } => {
            let minify = if no_minify { Some(false) } else { None };
            commands::preview::run(&cli.config, input, output, minify).await?;
        }
        Commands::Serve {
            input,
            port,
            no_open,
        } => {
            commands::serve::run(&cli.config, input, port, !no_open).await?;
        }
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
    }

    Ok(())
}
