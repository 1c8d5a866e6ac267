use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::core::errors::{Error, Result};
use crate::models::content::{ContentFormat, ContentModel};
use crate::models::file_entry::{FileDescriptor, FileKind};
use crate::services::fs::listing::{modified_time, resolve_api_path};

/// Boxed async result used by [`ContentsProvider`] methods.
pub type ContentsFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Content-fetch boundary used by the readme preview.
///
/// Production uses [`LocalContents`]; tests inject `MockContentsProvider`.
#[cfg_attr(test, mockall::automock)]
pub trait ContentsProvider: Send + Sync {
    /// Fetches the model and content of the entry at `path`, requiring it to
    /// be of `kind`.
    ///
    /// # Errors
    /// Fails when the entry is missing, unreadable, or of another kind.
    fn get(&self, path: String, kind: FileKind) -> ContentsFuture<Result<ContentModel>>;
}

/// Serves contents from a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalContents {
    root: Arc<PathBuf>,
}

impl LocalContents {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Arc::new(root.into()),
        }
    }
}

impl ContentsProvider for LocalContents {
    fn get(&self, path: String, kind: FileKind) -> ContentsFuture<Result<ContentModel>> {
        let root = Arc::clone(&self.root);
        Box::pin(async move { read_model(&root, path, kind).await })
    }
}

async fn read_model(root: &std::path::Path, path: String, kind: FileKind) -> Result<ContentModel> {
    let full = resolve_api_path(root, &path)?;
    let metadata = match tokio::fs::metadata(&full).await {
        Ok(md) => md,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(Error::NotFound(path)),
        Err(e) => return Err(e.into()),
    };
    if kind != FileKind::File || !metadata.is_file() {
        return Err(Error::WrongKind {
            path,
            expected: kind,
        });
    }

    let bytes = tokio::fs::read(&full).await?;
    let (content, format) = match String::from_utf8(bytes) {
        Ok(text) => (text, ContentFormat::Text),
        Err(e) => (STANDARD.encode(e.into_bytes()), ContentFormat::Base64),
    };

    let name = path.rsplit('/').next().unwrap_or(&path).to_string();
    let last_modified = modified_time(&metadata);

    tracing::debug!("fetched '{}' ({} bytes, {:?})", path, metadata.len(), format);

    Ok(ContentModel {
        file: FileDescriptor {
            name,
            path,
            kind: FileKind::File,
            size: metadata.len(),
            last_modified,
        },
        content,
        format,
    })
}
