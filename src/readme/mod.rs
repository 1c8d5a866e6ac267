//! The README preview shown above a directory listing.

pub mod controller;
pub mod decision;
pub mod panel;
pub mod patterns;
pub mod preview;

pub use controller::{spawn, BrowserEvent, ReadmeHandle};
pub use decision::needs_update;
pub use panel::{PanelBody, PanelSnapshot, ReadmePanel, TitleLink};
pub use patterns::{ReadmePattern, ReadmePatterns};
pub use preview::{DirectoryReadme, FetchTicket};
