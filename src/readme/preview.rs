use std::sync::Arc;

use time::format_description::well_known::Rfc3339;

use crate::core::config::{ReadmePreviewConfig, RenderOptions};
use crate::core::errors::Result;
use crate::models::content::{ContentModel, DisplayedReadme};
use crate::models::file_entry::{FileDescriptor, FileKind};
use crate::services::contents::ContentsProvider;
use crate::services::markdown::MarkdownRenderer;

use super::decision::needs_update;
use super::panel::ReadmePanel;
use super::patterns::{is_markdown_name, ReadmePatterns};

/// A content fetch issued for one listing event.
///
/// Completions are only applied while `epoch` is still the preview's current
/// epoch; anything older was superseded by a later event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    epoch: u64,
    file: FileDescriptor,
}

impl FetchTicket {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn path(&self) -> &str {
        &self.file.path
    }
}

/// Keeps the readme panel in sync with the directory listing.
pub struct DirectoryReadme {
    patterns: ReadmePatterns,
    renderer: Arc<dyn MarkdownRenderer>,
    render_options: RenderOptions,
    panel: ReadmePanel,
    displayed: Option<DisplayedReadme>,
    epoch: u64,
    pending: Option<FetchTicket>,
}

impl DirectoryReadme {
    pub fn new(config: &ReadmePreviewConfig, renderer: Arc<dyn MarkdownRenderer>) -> Self {
        Self::with_patterns(config, renderer, ReadmePatterns::default())
    }

    pub fn with_patterns(
        config: &ReadmePreviewConfig,
        renderer: Arc<dyn MarkdownRenderer>,
        patterns: ReadmePatterns,
    ) -> Self {
        Self {
            patterns,
            renderer,
            render_options: config.render,
            panel: ReadmePanel::new(config),
            displayed: None,
            epoch: 0,
            pending: None,
        }
    }

    pub fn panel(&self) -> &ReadmePanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut ReadmePanel {
        &mut self.panel
    }

    pub fn displayed(&self) -> Option<&DisplayedReadme> {
        self.displayed.as_ref()
    }

    pub fn pending(&self) -> Option<&FetchTicket> {
        self.pending.as_ref()
    }

    pub fn find_readme<'a>(&self, listing: &'a [FileDescriptor]) -> Option<&'a FileDescriptor> {
        self.patterns.find_readme(listing)
    }

    pub fn needs_update(&self, candidate: Option<&FileDescriptor>) -> bool {
        needs_update(self.displayed.as_ref().map(|d| &d.file), candidate)
    }

    /// Handles a freshly drawn listing.
    ///
    /// Returns a ticket when the caller has to fetch the selected file and
    /// hand the result to [`DirectoryReadme::complete`]. Every call starts a
    /// new epoch, so a fetch issued for an earlier listing can no longer land.
    pub fn fetch_readme(&mut self, listing: &[FileDescriptor]) -> Option<FetchTicket> {
        self.epoch += 1;
        self.pending = None;

        let readme = self.find_readme(listing);
        if !self.needs_update(readme) {
            return None;
        }

        match readme {
            None => {
                tracing::debug!("no readme in listing of {} entries", listing.len());
                self.clear_readme(None);
                None
            }
            Some(file) => {
                tracing::debug!(
                    "readme selected: '{}' modified {}",
                    file.path,
                    file.last_modified
                        .format(&Rfc3339)
                        .unwrap_or_else(|_| file.last_modified.to_string())
                );
                let ticket = FetchTicket {
                    epoch: self.epoch,
                    file: file.clone(),
                };
                self.pending = Some(ticket.clone());
                Some(ticket)
            }
        }
    }

    /// Applies the outcome of the fetch described by `ticket`.
    ///
    /// Returns `false` when the ticket was stale and the result was dropped.
    pub fn complete(&mut self, ticket: FetchTicket, result: Result<ContentModel>) -> bool {
        if ticket.epoch != self.epoch || self.pending.as_ref() != Some(&ticket) {
            tracing::debug!(
                "dropping stale readme fetch for '{}' (epoch {}, current {})",
                ticket.file.path,
                ticket.epoch,
                self.epoch
            );
            return false;
        }
        self.pending = None;

        match result {
            Ok(model) if model.is_text() => self.draw_readme(model),
            Ok(model) => {
                tracing::debug!("readme '{}' is not text, hiding", model.file.path);
                self.clear_readme(Some(model.file));
            }
            Err(e) => {
                tracing::warn!("failed to fetch readme '{}': {}", ticket.file.path, e);
                self.clear_readme(None);
            }
        }
        true
    }

    /// Selects, fetches and draws in one go.
    pub async fn refresh(&mut self, listing: &[FileDescriptor], contents: &dyn ContentsProvider) {
        if let Some(ticket) = self.fetch_readme(listing) {
            let result = contents.get(ticket.path().to_string(), FileKind::File).await;
            self.complete(ticket, result);
        }
    }

    /// Handles a deletion notice for `path`.
    ///
    /// Returns `true` when the panel was cleared. A fetch pending for the
    /// deleted path is abandoned as well.
    pub fn file_deleted(&mut self, path: &str) -> bool {
        let shown = self
            .displayed
            .as_ref()
            .is_some_and(|d| d.file.path == path);
        let pending = self.pending.as_ref().is_some_and(|t| t.path() == path);
        if !shown && !pending {
            return false;
        }

        tracing::debug!("readme '{}' deleted", path);
        if pending {
            self.epoch += 1;
            self.pending = None;
        }
        self.clear_readme(None);
        true
    }

    /// Draws `model` into the panel and records it as displayed.
    pub fn draw_readme(&mut self, model: ContentModel) {
        let ContentModel { file, content, .. } = model;

        if is_markdown_name(&file.name) {
            match self.renderer.render(&content, self.render_options) {
                Ok(html) => {
                    self.panel.show_html(&file, html);
                    self.panel.request_typeset();
                }
                Err(e) => {
                    tracing::warn!("failed to render readme '{}': {}", file.path, e);
                    self.clear_readme(Some(file));
                    return;
                }
            }
        } else {
            self.panel.show_text(&file, &content);
        }

        self.displayed = Some(DisplayedReadme {
            file,
            content: Some(content),
        });
    }

    /// Hides the panel. `retained` remembers a file that was attempted but
    /// could not be shown, so an unchanged listing does not fetch it again.
    pub fn clear_readme(&mut self, retained: Option<FileDescriptor>) {
        self.displayed = retained.map(|file| DisplayedReadme {
            file,
            content: None,
        });
        self.panel.hide();
    }
}
