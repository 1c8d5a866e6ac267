pub mod content;
pub mod file_entry;

pub use content::{ContentFormat, ContentModel, DisplayedReadme};
pub use file_entry::{FileDescriptor, FileKind};
