/// Options passed to the markdown renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub with_math: bool,
    pub sanitize: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            with_math: true,
            sanitize: true,
        }
    }
}

/// Describes how the readme panel is built and where its links point.
#[derive(Debug, Clone)]
pub struct ReadmePreviewConfig {
    /// DOM id of the panel container.
    pub element_id: String,
    /// Base URL of the notebook server; title links go to `<base_url>/edit/<path>`.
    pub base_url: String,
    pub render: RenderOptions,
}

impl ReadmePreviewConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for ReadmePreviewConfig {
    fn default() -> Self {
        Self {
            element_id: "directory_readme".to_string(),
            base_url: "/".to_string(),
            render: RenderOptions::default(),
        }
    }
}
