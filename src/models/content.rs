use super::file_entry::FileDescriptor;

/// Encoding of the `content` field returned by a content fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    Text,
    Base64,
}

/// File model returned by the contents collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentModel {
    pub file: FileDescriptor,
    pub content: String,
    pub format: ContentFormat,
}

impl ContentModel {
    pub fn is_text(&self) -> bool {
        self.format == ContentFormat::Text
    }
}

/// What the preview currently holds.
///
/// `content` is `None` when the file was attempted but could not be shown
/// (binary or otherwise unsupported); the reference is kept so that an
/// unchanged listing does not trigger the same fetch again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedReadme {
    pub file: FileDescriptor,
    pub content: Option<String>,
}

impl DisplayedReadme {
    pub fn is_shown(&self) -> bool {
        self.content.is_some()
    }
}
