use crate::models::file_entry::FileDescriptor;

/// Decides whether `candidate` must be fetched and drawn in place of `current`.
///
/// `current` is the record actually on display (or last attempted), so the
/// modification time compared is the one that was drawn.
pub fn needs_update(current: Option<&FileDescriptor>, candidate: Option<&FileDescriptor>) -> bool {
    match (current, candidate) {
        (None, None) => false,
        (Some(current), Some(candidate)) if std::ptr::eq(current, candidate) => false,
        (None, Some(_)) | (Some(_), None) => true,
        (Some(current), Some(candidate)) => {
            current.path != candidate.path || current.last_modified < candidate.last_modified
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::file_entry::FileKind;
    use time::macros::datetime;
    use time::OffsetDateTime;

    fn file(path: &str, last_modified: OffsetDateTime) -> FileDescriptor {
        FileDescriptor {
            name: path.rsplit('/').next().unwrap_or(path).to_string(),
            path: path.to_string(),
            kind: FileKind::File,
            size: 0,
            last_modified,
        }
    }

    #[test]
    fn nothing_twice_is_a_noop() {
        assert!(!needs_update(None, None));
    }

    #[test]
    fn same_reference_is_a_noop() {
        let a = file("p/README.md", datetime!(2024-01-01 0:00 UTC));
        assert!(!needs_update(Some(&a), Some(&a)));
    }

    #[test]
    fn appearing_or_vanishing_updates() {
        let a = file("p/README.md", datetime!(2024-01-01 0:00 UTC));
        assert!(needs_update(None, Some(&a)));
        assert!(needs_update(Some(&a), None));
    }

    #[test]
    fn newer_content_at_same_path_updates() {
        let shown = file("p/README.md", datetime!(2024-01-01 0:00:05 UTC));
        let newer = file("p/README.md", datetime!(2024-01-01 0:00:10 UTC));
        assert!(needs_update(Some(&shown), Some(&newer)));
    }

    #[test]
    fn same_or_older_content_at_same_path_is_skipped() {
        let shown = file("p/README.md", datetime!(2024-01-01 0:00:10 UTC));
        let same = shown.clone();
        let older = file("p/README.md", datetime!(2024-01-01 0:00:05 UTC));
        assert!(!needs_update(Some(&shown), Some(&same)));
        assert!(!needs_update(Some(&shown), Some(&older)));
    }

    #[test]
    fn different_path_updates_regardless_of_time() {
        let shown = file("p1/README.md", datetime!(2024-06-01 0:00 UTC));
        let other = file("p2/README.md", datetime!(2020-01-01 0:00 UTC));
        assert!(needs_update(Some(&shown), Some(&other)));
    }
}
