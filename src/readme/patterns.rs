use crate::models::file_entry::FileDescriptor;

/// A case-insensitive filename rule for README-like files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadmePattern {
    /// `<stem>.<ext>` for one of the listed extensions.
    Extensions {
        stem: &'static str,
        extensions: &'static [&'static str],
    },
    /// `<stem>` alone or followed by a single extension that has no further dot.
    AnyExtension { stem: &'static str },
}

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

impl ReadmePattern {
    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        match self {
            ReadmePattern::Extensions { stem, extensions } => name
                .strip_prefix(*stem)
                .and_then(|rest| rest.strip_prefix('.'))
                .is_some_and(|ext| extensions.iter().any(|e| *e == ext)),
            ReadmePattern::AnyExtension { stem } => match name.strip_prefix(*stem) {
                Some("") => true,
                Some(rest) => rest
                    .strip_prefix('.')
                    .is_some_and(|ext| !ext.contains('.')),
                None => false,
            },
        }
    }
}

/// Priority-ordered README rules, fixed once built.
#[derive(Debug, Clone)]
pub struct ReadmePatterns {
    patterns: Vec<ReadmePattern>,
}

impl ReadmePatterns {
    pub fn new(patterns: Vec<ReadmePattern>) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &[ReadmePattern] {
        &self.patterns
    }

    /// Picks the readme to show for `listing`.
    ///
    /// Rules are tried in priority order and, within a rule, entries in
    /// listing order, so the first file matching the best rule wins. Only
    /// plain files are eligible.
    pub fn find_readme<'a>(&self, listing: &'a [FileDescriptor]) -> Option<&'a FileDescriptor> {
        self.patterns.iter().find_map(|pattern| {
            listing
                .iter()
                .find(|file| file.is_file() && pattern.matches(&file.name))
        })
    }
}

impl Default for ReadmePatterns {
    fn default() -> Self {
        Self::new(vec![
            ReadmePattern::Extensions {
                stem: "readme",
                extensions: MARKDOWN_EXTENSIONS,
            },
            ReadmePattern::Extensions {
                stem: "about",
                extensions: MARKDOWN_EXTENSIONS,
            },
            ReadmePattern::AnyExtension { stem: "readme" },
            ReadmePattern::AnyExtension { stem: "about" },
        ])
    }
}

/// Whether `name` should be rendered through the markdown renderer.
pub fn is_markdown_name(name: &str) -> bool {
    let name = name.to_lowercase();
    name.ends_with(".md") || name.ends_with(".markdown")
}
