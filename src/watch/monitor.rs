// src/watch/monitor.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use crate::engine::ReactorEvent;
use crate::errors::Result;
use crate::watch::batch::{BatchBuilder, ChangeKind};
use crate::watch::path_utils::relative_str;
use crate::watch::patterns::PatternSet;

/// Keeps the OS watcher alive. Dropping it stops watching, after which the
/// forwarding task sends [`ReactorEvent::MonitorClosed`].
pub struct MonitorHandle {
    _watcher: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl std::fmt::Debug for MonitorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorHandle")
            .field("finished", &self.task.is_finished())
            .finish()
    }
}

/// Watch `root` recursively and send one [`ReactorEvent::Changes`] per
/// debounce window to `tx`.
///
/// A window opens with the first event after a quiet period and closes
/// `debounce` later. Paths are relativised to `root` and filtered through
/// `patterns`; windows with nothing left are dropped.
pub fn spawn_monitor(
    root: impl Into<PathBuf>,
    patterns: PatternSet,
    debounce: Duration,
    tx: mpsc::Sender<ReactorEvent>,
) -> Result<MonitorHandle> {
    let root = root.into();
    let root = root.canonicalize().unwrap_or(root);

    // Channel from the blocking notify callback into the async world.
    let (raw_tx, raw_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = raw_tx.send(event) {
                    eprintln!("remon: failed to forward file event: {err}");
                }
            }
            Err(err) => {
                eprintln!("remon: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!(root = ?root, ?debounce, "change monitor started");

    let task = tokio::spawn(forward_batches(root, patterns, debounce, raw_rx, tx));

    Ok(MonitorHandle {
        _watcher: watcher,
        task,
    })
}

async fn forward_batches(
    root: PathBuf,
    patterns: PatternSet,
    debounce: Duration,
    mut raw_rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::Sender<ReactorEvent>,
) {
    let mut builder = BatchBuilder::new();

    while let Some(first) = raw_rx.recv().await {
        absorb(&mut builder, &root, &patterns, first);

        let deadline = Instant::now() + debounce;
        let mut closed = false;
        loop {
            tokio::select! {
                next = raw_rx.recv() => match next {
                    Some(event) => absorb(&mut builder, &root, &patterns, event),
                    None => {
                        closed = true;
                        break;
                    }
                },
                _ = sleep_until(deadline) => break,
            }
        }

        if !builder.is_empty() {
            let batch = builder.take();
            debug!(
                added = batch.added.len(),
                changed = batch.changed.len(),
                deleted = batch.deleted.len(),
                "change batch ready"
            );
            if tx.send(ReactorEvent::Changes(batch)).await.is_err() {
                debug!("reactor gone; stopping change monitor");
                return;
            }
        }

        if closed {
            break;
        }
    }

    info!("change monitor stopped");
    let _ = tx.send(ReactorEvent::MonitorClosed).await;
}

fn absorb(builder: &mut BatchBuilder, root: &Path, patterns: &PatternSet, event: Event) {
    for (kind, path) in classify(&event) {
        // Directory entries carry no content of their own.
        if kind != ChangeKind::Deleted && path.is_dir() {
            continue;
        }
        let Some(rel) = relative_str(root, path) else {
            debug!(?path, "event outside watch root");
            continue;
        };
        if rel.is_empty() || !patterns.matches(&rel) {
            continue;
        }
        builder.record(kind, PathBuf::from(rel));
    }
}

/// Map a notify event onto added / changed / deleted paths.
fn classify(event: &Event) -> Vec<(ChangeKind, &Path)> {
    let paths = event.paths.iter().map(PathBuf::as_path);
    match event.kind {
        EventKind::Access(_) => Vec::new(),
        EventKind::Create(CreateKind::Folder) | EventKind::Remove(RemoveKind::Folder) => Vec::new(),
        EventKind::Create(_) => paths.map(|p| (ChangeKind::Added, p)).collect(),
        EventKind::Remove(_) => paths.map(|p| (ChangeKind::Deleted, p)).collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            paths.map(|p| (ChangeKind::Deleted, p)).collect()
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            paths.map(|p| (ChangeKind::Added, p)).collect()
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if event.paths.len() == 2 => vec![
            (ChangeKind::Deleted, event.paths[0].as_path()),
            (ChangeKind::Added, event.paths[1].as_path()),
        ],
        EventKind::Modify(ModifyKind::Name(_)) | EventKind::Any | EventKind::Other => paths
            .map(|p| {
                let kind = if p.exists() {
                    ChangeKind::Changed
                } else {
                    ChangeKind::Deleted
                };
                (kind, p)
            })
            .collect(),
        EventKind::Modify(_) => paths.map(|p| (ChangeKind::Changed, p)).collect(),
    }
}
