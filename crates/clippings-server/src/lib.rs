//! Live preview server for Kindle clippings.
//!
//! Holds the most recent extraction, replaces it whenever the watched export
//! changes or a new one is uploaded, and pushes the re-rendered preview to
//! connected browsers over a WebSocket.

pub mod live;
pub mod server;
pub mod watcher;

pub use live::{LiveHub, LiveMessage};
pub use server::{PreviewServer, PreviewServerConfig, ServerError};
pub use watcher::{FileWatcher, WatchEvent};
