//! Watching the notebook export for changes.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Quiet period after the last write before an event is forwarded.
const DEBOUNCE: Duration = Duration::from_millis(100);

/// Events emitted by the file watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// The export was created or rewritten
    Changed(PathBuf),

    /// The export was deleted
    Removed(PathBuf),
}

/// Watches a single export file.
///
/// The parent directory is watched so that editors and downloads that
/// replace the file instead of writing in place are still picked up.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Create a new watcher for `target`.
    ///
    /// Returns the watcher and a channel to receive events.
    pub fn new(target: &Path) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        let target = target.to_path_buf();
        let dir = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf();

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(std::io::Error::other)?;

        let file_name = target.file_name().map(|n| n.to_os_string());

        std::thread::spawn(move || {
            // Only the last event of a burst is forwarded, once the file has
            // been quiet for DEBOUNCE.
            let mut pending: Option<WatchEvent> = None;
            let mut deadline = Instant::now();

            loop {
                let event = if pending.is_some() {
                    match sync_rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                        Ok(event) => event,
                        Err(mpsc::RecvTimeoutError::Timeout) => {
                            if let Some(watch_event) = pending.take() {
                                if async_tx.blocking_send(watch_event).is_err() {
                                    return;
                                }
                            }
                            continue;
                        }
                        Err(mpsc::RecvTimeoutError::Disconnected) => break,
                    }
                } else {
                    match sync_rx.recv() {
                        Ok(event) => event,
                        Err(_) => break,
                    }
                };

                let relevant = event
                    .paths
                    .iter()
                    .any(|path| path.file_name().map(|n| n.to_os_string()) == file_name);
                if !relevant {
                    continue;
                }

                if let Some(watch_event) = classify_event(&target, &event.kind) {
                    pending = Some(watch_event);
                    deadline = Instant::now() + DEBOUNCE;
                }
            }

            if let Some(watch_event) = pending {
                let _ = async_tx.blocking_send(watch_event);
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Classify a notify event on the target file.
fn classify_event(target: &Path, kind: &notify::EventKind) -> Option<WatchEvent> {
    use notify::EventKind;

    match kind {
        EventKind::Create(_) | EventKind::Modify(_) => Some(WatchEvent::Changed(target.to_path_buf())),
        EventKind::Remove(_) => Some(WatchEvent::Removed(target.to_path_buf())),
        _ => None,
    }
}
