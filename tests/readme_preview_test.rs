use anyhow::Result;
use nohrs_readme::models::FileDescriptor;
use nohrs_readme::readme::PanelBody;
use nohrs_readme::services::contents::LocalContents;
use nohrs_readme::services::fs::listing::{list_dir, ListParams};
use nohrs_readme::services::markdown::ComrakRenderer;
use nohrs_readme::{DirectoryReadme, ReadmePreviewConfig};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tempfile::tempdir;

async fn listing(root: &Path, path: &str) -> Result<Vec<FileDescriptor>> {
    Ok(list_dir(ListParams {
        root,
        path,
        show_hidden: false,
    })
    .await?)
}

fn preview(base_url: &str) -> DirectoryReadme {
    DirectoryReadme::new(&ReadmePreviewConfig::new(base_url), Arc::new(ComrakRenderer))
}

#[tokio::test]
async fn markdown_readme_is_rendered() -> Result<()> {
    let root = tempdir()?;
    fs::create_dir(root.path().join("proj"))?;
    fs::write(root.path().join("proj/notes.txt"), "not me")?;
    fs::write(root.path().join("proj/README.md"), "# Hi")?;
    let contents = LocalContents::new(root.path());
    let mut preview = preview("/hub/");

    preview.refresh(&listing(root.path(), "proj").await?, &contents).await;

    let panel = preview.panel();
    assert!(panel.is_visible());
    let title = panel.title().expect("title is set");
    assert_eq!(title.text, "README.md");
    assert_eq!(title.href, "/hub/edit/proj/README.md");
    assert!(panel.body_html().contains("<h1>Hi</h1>"));
    Ok(())
}

#[tokio::test]
async fn no_candidate_hides_panel() -> Result<()> {
    let root = tempdir()?;
    fs::write(root.path().join("notes.txt"), "x")?;
    fs::create_dir(root.path().join("README"))?;
    let contents = LocalContents::new(root.path());
    let mut preview = preview("/");

    preview.refresh(&listing(root.path(), "").await?, &contents).await;

    assert!(!preview.panel().is_visible());
    assert!(preview.displayed().is_none());
    Ok(())
}

#[tokio::test]
async fn binary_readme_is_not_fetched_twice() -> Result<()> {
    let root = tempdir()?;
    fs::write(root.path().join("README"), [0x89_u8, b'P', b'N', b'G', 0xff])?;
    let contents = LocalContents::new(root.path());
    let mut preview = preview("/");
    let entries = listing(root.path(), "").await?;

    preview.refresh(&entries, &contents).await;
    assert!(!preview.panel().is_visible());
    assert_eq!(
        preview.displayed().map(|d| d.file.path.as_str()),
        Some("README")
    );

    assert!(preview.fetch_readme(&entries).is_none());
    Ok(())
}

#[tokio::test]
async fn plain_text_keeps_markup_literal() -> Result<()> {
    let root = tempdir()?;
    fs::write(root.path().join("readme.txt"), "Line1\r\n<em>Line2</em>")?;
    let contents = LocalContents::new(root.path());
    let mut preview = preview("/");

    preview.refresh(&listing(root.path(), "").await?, &contents).await;

    assert_eq!(
        preview.panel().body(),
        &PanelBody::Preformatted("Line1\n<em>Line2</em>".to_string())
    );
    assert_eq!(
        preview.panel().body_html(),
        "<pre>Line1\n&lt;em&gt;Line2&lt;/em&gt;</pre>"
    );
    Ok(())
}

#[tokio::test]
async fn unrelated_deletion_leaves_panel() -> Result<()> {
    let root = tempdir()?;
    fs::write(root.path().join("ABOUT.md"), "about")?;
    fs::write(root.path().join("data.csv"), "a,b")?;
    let contents = LocalContents::new(root.path());
    let mut preview = preview("/");

    preview.refresh(&listing(root.path(), "").await?, &contents).await;
    assert!(preview.panel().is_visible());

    assert!(!preview.file_deleted("data.csv"));
    assert!(preview.panel().is_visible());
    assert_eq!(
        preview.displayed().map(|d| d.file.name.as_str()),
        Some("ABOUT.md")
    );
    Ok(())
}

#[tokio::test]
async fn edited_readme_is_redrawn() -> Result<()> {
    let root = tempdir()?;
    let readme = root.path().join("README");
    fs::write(&readme, "first")?;
    let file = fs::File::options().write(true).open(&readme)?;
    file.set_modified(SystemTime::now() - Duration::from_secs(60))?;
    let contents = LocalContents::new(root.path());
    let mut preview = preview("/");

    preview.refresh(&listing(root.path(), "").await?, &contents).await;
    assert_eq!(preview.panel().body_html(), "<pre>first</pre>");

    fs::write(&readme, "second")?;
    let file = fs::File::options().write(true).open(&readme)?;
    file.set_modified(SystemTime::now())?;
    preview.refresh(&listing(root.path(), "").await?, &contents).await;
    assert_eq!(preview.panel().body_html(), "<pre>second</pre>");
    Ok(())
}
