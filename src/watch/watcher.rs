// src/watch/watcher.rs

use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::types::ChangeEvent;
use crate::watch::event_handler::filter_event;
use crate::watch::path_utils::RootAlias;
use crate::watch::patterns::{watch_roots, WatchSet};

/// Handle for a filesystem watch subscription.
///
/// Owns the underlying `RecommendedWatcher` and the task forwarding its
/// events. Dropping the handle (or calling [`WatcherHandle::close`]) releases
/// the OS watches.
#[derive(Default)]
pub struct WatcherHandle {
    inner: Option<RecommendedWatcher>,
    task: Option<JoinHandle<()>>,
    roots: Vec<PathBuf>,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("roots", &self.roots)
            .field("active", &self.is_active())
            .finish()
    }
}

impl WatcherHandle {
    /// A handle that owns nothing. Used by backends that deliver events
    /// through other means (and by tests).
    pub fn detached() -> Self {
        Self::default()
    }

    /// Directories actually being watched.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn is_active(&self) -> bool {
        self.inner.is_some()
    }

    /// Stop watching. Idempotent.
    pub fn close(&mut self) {
        if let Some(watcher) = self.inner.take() {
            drop(watcher);
            debug!(roots = ?self.roots, "file watcher released");
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        self.close();
    }
}

/// The watch primitive used by the pipeline stage.
///
/// Implementations send one [`ChangeEvent`] per relevant change on `tx`
/// until the returned handle is dropped.
pub trait WatchBackend: Send + Sync + Debug {
    fn watch(&self, patterns: &[String], tx: mpsc::Sender<ChangeEvent>) -> Result<WatcherHandle>;
}

/// Production backend built on `notify`.
#[derive(Debug, Clone, Default)]
pub struct NotifyWatchBackend;

impl WatchBackend for NotifyWatchBackend {
    fn watch(&self, patterns: &[String], tx: mpsc::Sender<ChangeEvent>) -> Result<WatcherHandle> {
        spawn_watcher(patterns, tx)
    }
}

/// Spawn a filesystem watcher for the given absolute `patterns` and forward
/// matching changes to `tx`.
///
/// Directories that cannot be watched (e.g. they do not exist yet) are
/// skipped with a warning; changes under them are never reported.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_watcher(patterns: &[String], tx: mpsc::Sender<ChangeEvent>) -> Result<WatcherHandle> {
    let set = WatchSet::new(patterns)?;
    let roots = watch_roots(patterns);

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if event_tx.send(event).is_err() {
                    debug!("watch event dropped; forwarder stopped");
                }
            }
            Err(err) => warn!(error = %err, "file watch error"),
        },
        Config::default(),
    )
    .context("creating file watcher")?;

    let mut active = Vec::with_capacity(roots.len());
    for root in &roots {
        let mode = if root.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        match watcher.watch(&root.path, mode) {
            Ok(()) => {
                info!(root = ?root.path, recursive = root.recursive, "watching");
                active.push(root.path.clone());
            }
            Err(err) => {
                warn!(root = ?root.path, error = %err, "could not watch directory; changes there will not be seen");
            }
        }
    }

    let aliases: Arc<Vec<RootAlias>> = Arc::new(active.iter().map(|p| RootAlias::new(p.clone())).collect());

    let task = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!(?event, "received notify event");

            for change in filter_event(&set, &aliases, &event) {
                debug!(kind = %change.kind, path = ?change.path, "watched file changed");
                if tx.send(change).await.is_err() {
                    debug!("change receiver closed; stopping watcher loop");
                    return;
                }
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle {
        inner: Some(watcher),
        task: Some(task),
        roots: active,
    })
}
