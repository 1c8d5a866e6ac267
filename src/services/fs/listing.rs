use crate::core::errors::{Error, Result};
use crate::models::file_entry::{FileDescriptor, FileKind};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use time::OffsetDateTime;
use tokio::task;

pub struct ListParams<'a> {
    /// Directory the server exposes; listed paths are relative to it.
    pub root: &'a Path,
    /// Root-relative directory to list, `/`-separated. Empty means the root itself.
    pub path: &'a str,
    pub show_hidden: bool,
}

pub async fn list_dir(params: ListParams<'_>) -> Result<Vec<FileDescriptor>> {
    // Use a blocking task for filesystem IO to avoid blocking async executors.
    let root = params.root.to_path_buf();
    let path = params.path.to_string();
    let show_hidden = params.show_hidden;

    task::spawn_blocking(move || list_dir_impl(&root, &path, show_hidden))
        .await
        .map_err(|e| Error::Other(format!("listing task failed: {e}")))?
}

/// Synchronous variant for contexts where an async runtime is not available.
pub fn list_dir_sync(params: ListParams<'_>) -> Result<Vec<FileDescriptor>> {
    list_dir_impl(params.root, params.path, params.show_hidden)
}

/// Joins a root-relative directory and an entry name into an API path.
pub fn join_api_path(dir: &str, name: &str) -> String {
    let dir = dir.trim_matches('/');
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

/// Resolves a root-relative API path to a filesystem path, refusing anything
/// that would climb out of `root`.
pub fn resolve_api_path(root: &Path, api_path: &str) -> Result<PathBuf> {
    let mut full = root.to_path_buf();
    for segment in api_path.split('/') {
        match segment {
            "" | "." => {}
            ".." => return Err(Error::OutsideRoot(PathBuf::from(api_path))),
            s => full.push(s),
        }
    }
    Ok(full)
}

fn list_dir_impl(root: &Path, path: &str, show_hidden: bool) -> Result<Vec<FileDescriptor>> {
    let dir = resolve_api_path(root, path)?;
    if !dir.is_dir() {
        return Err(Error::NotFound(path.to_string()));
    }

    let mut names: Vec<(String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        let file_name = os_str_to_string(entry.file_name());
        if !show_hidden && file_name.starts_with('.') {
            continue;
        }
        names.push((file_name, entry.path()));
    }
    names.sort_by(|a, b| a.0.to_lowercase().cmp(&b.0.to_lowercase()));

    let mut entries = Vec::with_capacity(names.len());
    for (name, full) in names {
        // Follow symlinks; a dangling link is listed as `Other`.
        let (kind, size, last_modified) = match fs::metadata(&full) {
            Ok(md) => {
                let modified = modified_time(&md);
                if md.is_dir() {
                    (FileKind::Dir, 0, modified)
                } else if md.is_file() {
                    (classify_file(&name), md.len(), modified)
                } else {
                    (FileKind::Other, 0, modified)
                }
            }
            Err(_) => (FileKind::Other, 0, OffsetDateTime::UNIX_EPOCH),
        };

        entries.push(FileDescriptor {
            path: join_api_path(path, &name),
            name,
            kind,
            size,
            last_modified,
        });
    }

    Ok(entries)
}

/// Modification time of `md`, or the epoch when it is unavailable or out of
/// the range `OffsetDateTime` can represent.
pub fn modified_time(md: &fs::Metadata) -> OffsetDateTime {
    md.modified()
        .ok()
        .and_then(to_offset_date_time)
        .unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

fn to_offset_date_time(t: SystemTime) -> Option<OffsetDateTime> {
    match t.duration_since(UNIX_EPOCH) {
        Ok(after) => OffsetDateTime::UNIX_EPOCH.checked_add(after.try_into().ok()?),
        Err(e) => OffsetDateTime::UNIX_EPOCH.checked_sub(e.duration().try_into().ok()?),
    }
}

fn classify_file(name: &str) -> FileKind {
    let is_notebook = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ipynb"));
    if is_notebook {
        FileKind::Notebook
    } else {
        FileKind::File
    }
}

fn os_str_to_string(s: impl AsRef<OsStr>) -> String {
    s.as_ref().to_string_lossy().into_owned()
}
