use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;

use nohrs_readme::core::telemetry::logging::init_logging;
use nohrs_readme::readme::{self, BrowserEvent, PanelSnapshot, ReadmeHandle};
use nohrs_readme::services::contents::LocalContents;
use nohrs_readme::services::fs::listing::{join_api_path, list_dir, resolve_api_path, ListParams};
use nohrs_readme::services::markdown::ComrakRenderer;
use nohrs_readme::services::watcher::FileWatcher;
use nohrs_readme::{DirectoryReadme, ReadmePreviewConfig, RenderOptions};

/// Render the README panel for a directory the way the file browser shows it.
#[derive(Debug, Parser)]
#[command(name = "nohrs-readme", version)]
struct Args {
    /// Directory to preview, relative to --root.
    #[arg(default_value = "")]
    path: String,

    /// Directory served as the contents root.
    #[arg(long, env = "NOHRS_ROOT", default_value = ".")]
    root: PathBuf,

    /// Base URL used for the title's edit link.
    #[arg(long, env = "NOHRS_BASE_URL", default_value = "/")]
    base_url: String,

    /// Keep running and redraw whenever the directory changes.
    #[arg(long)]
    watch: bool,

    /// Print the panel as a JSON snapshot instead of HTML.
    #[arg(long)]
    json: bool,

    #[arg(long)]
    no_math: bool,

    /// Pass raw HTML in markdown through untouched.
    #[arg(long)]
    no_sanitize: bool,

    #[arg(long)]
    show_hidden: bool,
}

impl Args {
    fn config(&self) -> ReadmePreviewConfig {
        ReadmePreviewConfig {
            base_url: self.base_url.clone(),
            render: RenderOptions {
                with_math: !self.no_math,
                sanitize: !self.no_sanitize,
            },
            ..ReadmePreviewConfig::default()
        }
    }

    fn list_params(&self) -> ListParams<'_> {
        ListParams {
            root: &self.root,
            path: &self.path,
            show_hidden: self.show_hidden,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let preview = DirectoryReadme::new(&args.config(), Arc::new(ComrakRenderer));
    let contents = Arc::new(LocalContents::new(args.root.clone()));
    let handle = readme::spawn(preview, contents);

    let listing = list_dir(args.list_params())
        .await
        .with_context(|| format!("failed to list '{}'", args.path))?;
    handle
        .events
        .send(BrowserEvent::ListingDrawn(listing))
        .await
        .context("readme controller stopped")?;

    if args.watch {
        watch(&args, handle).await
    } else {
        let ReadmeHandle {
            events,
            snapshots,
            task,
        } = handle;
        drop(events);
        task.await.context("readme controller panicked")?;
        let snapshot = snapshots.borrow().clone();
        print_snapshot(&args, &snapshot)
    }
}

async fn watch(args: &Args, handle: ReadmeHandle) -> Result<()> {
    let ReadmeHandle {
        events,
        mut snapshots,
        task,
    } = handle;

    let dir = std::fs::canonicalize(resolve_api_path(&args.root, &args.path)?)?;
    let (tx, mut changes) = mpsc::channel(16);
    let _watcher = FileWatcher::new(dir.clone(), tx, Duration::from_millis(250))?;
    tracing::info!("watching {}", dir.display());

    let initial = snapshots.borrow_and_update().clone();
    print_snapshot(args, &initial)?;

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                print_snapshot(args, &snapshot)?;
            }
            Some(paths) = changes.recv() => {
                for path in deleted_api_paths(&args.path, &dir, &paths) {
                    events.send(BrowserEvent::FileDeleted(path)).await?;
                }
                match list_dir(args.list_params()).await {
                    Ok(listing) => events.send(BrowserEvent::ListingDrawn(listing)).await?,
                    Err(e) => tracing::warn!("failed to relist '{}': {}", args.path, e),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    drop(events);
    task.await.context("readme controller panicked")?;
    Ok(())
}

/// Maps vanished direct children of `dir` to their API paths.
fn deleted_api_paths(api_dir: &str, dir: &Path, paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .filter(|p| p.parent() == Some(dir) && !p.exists())
        .filter_map(|p| p.file_name())
        .map(|name| join_api_path(api_dir, &name.to_string_lossy()))
        .collect()
}

fn print_snapshot(args: &Args, snapshot: &PanelSnapshot) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string(snapshot)?);
    } else {
        println!("{}", snapshot.markup);
    }
    Ok(())
}
