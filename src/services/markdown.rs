use comrak::{markdown_to_html, Options};

use crate::core::config::RenderOptions;
use crate::core::errors::Result;

/// Markdown-to-HTML boundary. Sanitization of untrusted HTML is the
/// renderer's job, driven by [`RenderOptions::sanitize`].
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, source: &str, options: RenderOptions) -> Result<String>;
}

/// CommonMark + GFM renderer backed by comrak.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComrakRenderer;

impl MarkdownRenderer for ComrakRenderer {
    fn render(&self, source: &str, options: RenderOptions) -> Result<String> {
        let mut opts = Options::default();
        opts.extension.strikethrough = true;
        opts.extension.table = true;
        opts.extension.autolink = true;
        opts.extension.tasklist = true;
        opts.extension.math_dollars = options.with_math;
        // Raw HTML is dropped and dangerous link schemes are filtered unless
        // sanitization is turned off.
        opts.render.unsafe_ = !options.sanitize;

        Ok(markdown_to_html(source, &opts))
    }
}
