use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::core::config::ReadmePreviewConfig;
use crate::models::file_entry::FileDescriptor;

/// Characters left alone by `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Joins URL parts with single slashes, skipping empty parts.
///
/// Only the first run of repeated slashes is collapsed, which is what the
/// notebook server's client does as well.
pub fn url_path_join(parts: &[&str]) -> String {
    let mut url = String::new();
    for part in parts.iter().filter(|p| !p.is_empty()) {
        if !url.is_empty() && !url.ends_with('/') {
            url.push('/');
        }
        url.push_str(part);
    }

    if let Some(start) = url.find("//") {
        let end = url[start..]
            .find(|c: char| c != '/')
            .map_or(url.len(), |offset| start + offset);
        url.replace_range(start..end, "/");
    }
    url
}

/// Percent-encodes every segment of a `/`-separated path, keeping the slashes.
pub fn encode_uri_components(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, URI_COMPONENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn edit_url(base_url: &str, path: &str) -> String {
    url_path_join(&[base_url, "edit", &encode_uri_components(path)])
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleLink {
    pub text: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelBody {
    Empty,
    /// Renderer output, injected as-is.
    Html(String),
    /// Literal text shown inside `<pre>`.
    Preformatted(String),
}

/// Serializable view of the panel for callers outside the crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelSnapshot {
    pub visible: bool,
    pub title: Option<TitleLink>,
    /// Content region only.
    pub html: String,
    /// The whole container, header included, as [`ReadmePanel::to_html`] renders it.
    pub markup: String,
    /// Math in `html` still needs to be laid out by the host.
    pub typeset: bool,
}

impl PanelSnapshot {
    /// Equal apart from the typeset request.
    pub fn same_content(&self, other: &PanelSnapshot) -> bool {
        self.visible == other.visible && self.title == other.title && self.html == other.html
    }
}

/// The readme container shown above the file listing: a header with a file
/// icon and a title link, and a content region.
#[derive(Debug, Clone)]
pub struct ReadmePanel {
    element_id: String,
    base_url: String,
    visible: bool,
    title: Option<TitleLink>,
    body: PanelBody,
    typeset_pending: bool,
}

impl ReadmePanel {
    /// Builds the panel hidden and empty.
    pub fn new(config: &ReadmePreviewConfig) -> Self {
        Self {
            element_id: config.element_id.clone(),
            base_url: config.base_url.clone(),
            visible: false,
            title: None,
            body: PanelBody::Empty,
            typeset_pending: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn title(&self) -> Option<&TitleLink> {
        self.title.as_ref()
    }

    pub fn body(&self) -> &PanelBody {
        &self.body
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Shows `file` with already rendered HTML.
    pub fn show_html(&mut self, file: &FileDescriptor, html: String) {
        self.show_title(file);
        self.body = PanelBody::Html(html);
    }

    /// Shows `file` as literal text with CRLF line endings normalized.
    pub fn show_text(&mut self, file: &FileDescriptor, content: &str) {
        self.show_title(file);
        self.body = PanelBody::Preformatted(content.replace("\r\n", "\n"));
    }

    fn show_title(&mut self, file: &FileDescriptor) {
        self.visible = true;
        self.typeset_pending = false;
        self.title = Some(TitleLink {
            text: file.name.clone(),
            href: edit_url(&self.base_url, &file.path),
        });
    }

    /// Asks whoever hosts the panel to lay out math in the content region.
    pub fn request_typeset(&mut self) {
        self.typeset_pending = true;
    }

    /// Returns and resets the pending typeset request.
    pub fn take_typeset_request(&mut self) -> bool {
        std::mem::take(&mut self.typeset_pending)
    }

    pub fn typeset_pending(&self) -> bool {
        self.typeset_pending
    }

    pub fn body_html(&self) -> String {
        match &self.body {
            PanelBody::Empty => String::new(),
            PanelBody::Html(html) => html.clone(),
            PanelBody::Preformatted(text) => format!("<pre>{}</pre>", escape_html(text)),
        }
    }

    pub fn to_html(&self) -> String {
        let style = if self.visible {
            ""
        } else {
            " style=\"display: none\""
        };
        let title = match &self.title {
            Some(link) => format!(
                "<a href=\"{}\">{}</a>",
                escape_html(&link.href),
                escape_html(&link.text)
            ),
            None => "<a></a>".to_string(),
        };
        format!(
            "<div id=\"{id}\" class=\"list_container\"{style}>\
             <div class=\"list_header row readme_header\">\
             <i class=\"item_icon file_icon\"></i>{title}</div>\
             <div class=\"readme_content\">{body}</div></div>",
            id = escape_html(&self.element_id),
            body = self.body_html(),
        )
    }

    pub fn snapshot(&self) -> PanelSnapshot {
        PanelSnapshot {
            visible: self.visible,
            title: self.title.clone(),
            html: self.body_html(),
            markup: self.to_html(),
            typeset: self.typeset_pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::file_entry::FileKind;
    use time::OffsetDateTime;

    fn file(path: &str) -> FileDescriptor {
        FileDescriptor {
            name: path.rsplit('/').next().unwrap_or(path).to_string(),
            path: path.to_string(),
            kind: FileKind::File,
            size: 0,
            last_modified: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn joins_url_parts() {
        assert_eq!(url_path_join(&["/", "edit", "a/b.md"]), "/edit/a/b.md");
        assert_eq!(url_path_join(&["/base/", "", "edit"]), "/base/edit");
        assert_eq!(url_path_join(&["/base//", "edit"]), "/base/edit");
        assert_eq!(url_path_join(&["http://host/", "edit"]), "http:/host/edit");
    }

    #[test]
    fn encodes_each_segment() {
        assert_eq!(
            encode_uri_components("my docs/Read Me#1.md"),
            "my%20docs/Read%20Me%231.md"
        );
        assert_eq!(encode_uri_components("a/(b)!~*'.md"), "a/(b)!~*'.md");
        assert_eq!(encode_uri_components("ü.md"), "%C3%BC.md");
    }

    #[test]
    fn title_links_to_editor() {
        let mut panel = ReadmePanel::new(&ReadmePreviewConfig::new("/user/x/"));
        panel.show_text(&file("sub dir/README"), "hi");

        let title = panel.title().expect("title after show");
        assert_eq!(title.text, "README");
        assert_eq!(title.href, "/user/x/edit/sub%20dir/README");
        assert!(panel.is_visible());
    }

    #[test]
    fn text_is_escaped_and_normalized() {
        let mut panel = ReadmePanel::new(&ReadmePreviewConfig::default());
        panel.show_text(&file("notes.txt"), "Line1\r\n<b>Line2</b>");

        assert_eq!(
            panel.body(),
            &PanelBody::Preformatted("Line1\n<b>Line2</b>".to_string())
        );
        assert_eq!(panel.body_html(), "<pre>Line1\n&lt;b&gt;Line2&lt;/b&gt;</pre>");
    }

    #[test]
    fn hidden_panel_keeps_markup_but_hides() {
        let mut panel = ReadmePanel::new(&ReadmePreviewConfig::default());
        assert!(panel.to_html().contains("style=\"display: none\""));

        panel.show_html(&file("README.md"), "<h1>Hi</h1>".to_string());
        let html = panel.to_html();
        assert!(!html.contains("display: none"));
        assert!(html.contains("<a href=\"/edit/README.md\">README.md</a>"));
        assert!(html.contains("<div class=\"readme_content\"><h1>Hi</h1></div>"));

        panel.hide();
        let snapshot = panel.snapshot();
        assert!(!snapshot.visible);
        assert_eq!(snapshot.markup, panel.to_html());
        assert_eq!(snapshot.html, "<h1>Hi</h1>");
    }

    #[test]
    fn typeset_request_is_taken_once() {
        let mut panel = ReadmePanel::new(&ReadmePreviewConfig::default());
        panel.request_typeset();
        assert!(panel.take_typeset_request());
        assert!(!panel.take_typeset_request());
    }
}
