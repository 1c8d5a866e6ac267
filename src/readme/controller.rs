use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};

use crate::core::errors::{Error, Result};
use crate::models::content::ContentModel;
use crate::models::file_entry::{FileDescriptor, FileKind};
use crate::services::contents::ContentsProvider;

use super::panel::PanelSnapshot;
use super::preview::{DirectoryReadme, FetchTicket};

const EVENT_QUEUE: usize = 64;

/// Notifications emitted by the directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserEvent {
    /// The listing was (re)drawn with these entries.
    ListingDrawn(Vec<FileDescriptor>),
    /// The entry at this path was deleted.
    FileDeleted(String),
}

/// Handles to a spawned readme controller.
pub struct ReadmeHandle {
    pub events: mpsc::Sender<BrowserEvent>,
    pub snapshots: watch::Receiver<PanelSnapshot>,
    /// Resolves to the final preview state once `events` is dropped and all
    /// in-flight fetches have landed.
    pub task: JoinHandle<DirectoryReadme>,
}

/// Spawns [`run`] on the current tokio runtime.
pub fn spawn(preview: DirectoryReadme, contents: Arc<dyn ContentsProvider>) -> ReadmeHandle {
    let (events_tx, events_rx) = mpsc::channel(EVENT_QUEUE);
    let (snapshot_tx, snapshot_rx) = watch::channel(preview.panel().snapshot());
    let task = tokio::spawn(run(preview, contents, events_rx, snapshot_tx));

    ReadmeHandle {
        events: events_tx,
        snapshots: snapshot_rx,
        task,
    }
}

/// Drives `preview` from listing events until the event channel closes.
///
/// Fetches run concurrently on a [`JoinSet`]; their results go through
/// [`DirectoryReadme::complete`], which drops anything a newer event has
/// superseded. A snapshot is published whenever the panel changes.
pub async fn run(
    mut preview: DirectoryReadme,
    contents: Arc<dyn ContentsProvider>,
    mut events: mpsc::Receiver<BrowserEvent>,
    snapshots: watch::Sender<PanelSnapshot>,
) -> DirectoryReadme {
    let mut fetches: JoinSet<(FetchTicket, Result<ContentModel>)> = JoinSet::new();
    let mut listening = true;

    loop {
        tokio::select! {
            event = events.recv(), if listening => match event {
                Some(BrowserEvent::ListingDrawn(listing)) => {
                    if let Some(ticket) = preview.fetch_readme(&listing) {
                        let contents = Arc::clone(&contents);
                        let path = ticket.path().to_string();
                        fetches.spawn(async move {
                            // The fetch runs in its own task so a panicking
                            // provider still resolves the ticket.
                            let fetch = tokio::spawn(async move {
                                contents.get(path, FileKind::File).await
                            });
                            let result = match fetch.await {
                                Ok(result) => result,
                                Err(e) => Err(Error::Other(format!("fetch task failed: {e}"))),
                            };
                            (ticket, result)
                        });
                    }
                }
                Some(BrowserEvent::FileDeleted(path)) => {
                    preview.file_deleted(&path);
                }
                None => listening = false,
            },
            Some(joined) = fetches.join_next(), if !fetches.is_empty() => match joined {
                Ok((ticket, result)) => {
                    preview.complete(ticket, result);
                }
                Err(e) => tracing::warn!("readme fetch task failed: {}", e),
            },
            else => break,
        }

        // A typeset request rides along with the snapshot that carries the
        // new content and is consumed there.
        let next = preview.panel().snapshot();
        preview.panel_mut().take_typeset_request();
        snapshots.send_if_modified(|current| {
            if current.same_content(&next) {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    preview
}
