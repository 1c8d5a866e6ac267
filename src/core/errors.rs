use std::path::PathBuf;

use thiserror::Error;

use crate::models::file_entry::FileKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no such file or directory: {0}")]
    NotFound(String),
    #[error("'{path}' is not a {expected}")]
    WrongKind { path: String, expected: FileKind },
    #[error("path '{}' escapes the contents root", .0.display())]
    OutsideRoot(PathBuf),
    #[error("markdown render failed: {0}")]
    Render(String),
    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),
    #[error("other error: {0}")]
    Other(String),
}
