use crate::core::errors::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

/// Watches a single directory (not its subtree) and forwards debounced
/// batches of changed paths.
pub struct FileWatcher {
    // Keep debouncer alive
    _debouncer: Debouncer<notify::RecommendedWatcher>,
}

impl FileWatcher {
    pub fn new(dir: PathBuf, tx: mpsc::Sender<Vec<PathBuf>>, timeout: Duration) -> Result<Self> {
        let mut debouncer = new_debouncer(timeout, move |res: DebounceEventResult| match res {
            Ok(events) => {
                let paths: Vec<PathBuf> = events.into_iter().map(|e| e.path).collect();
                // notify calls us on its own thread, so a blocking send is fine.
                if let Err(e) = tx.blocking_send(paths) {
                    tracing::warn!("Failed to send watcher events: {}", e);
                }
            }
            Err(e) => {
                tracing::warn!("Watcher error: {:?}", e);
            }
        })?;

        debouncer.watcher().watch(&dir, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _debouncer: debouncer,
        })
    }
}
