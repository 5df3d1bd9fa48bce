#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};

use anyhow::anyhow;
use tokio::sync::mpsc;
use watchglob::errors::{Result, WatchglobError};
use watchglob::resolve::Expander;
use watchglob::resource::{Resource, ResourceLoader};
use watchglob::types::{ChangeEvent, ChangeKind};
use watchglob::watch::{WatchBackend, WatcherHandle};

/// Watch backend whose change events are injected by the test.
#[derive(Debug, Clone, Default)]
pub struct ManualWatch {
    tx: Arc<Mutex<Option<mpsc::Sender<ChangeEvent>>>>,
    patterns: Arc<Mutex<Vec<String>>>,
    registrations: Arc<AtomicUsize>,
}

impl ManualWatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patterns passed to the most recent `watch` call.
    pub fn patterns(&self) -> Vec<String> {
        self.patterns.lock().unwrap().clone()
    }

    pub fn registrations(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }

    /// Deliver one change event to the stage. Returns false once the stage
    /// has stopped listening.
    pub async fn emit(&self, event: ChangeEvent) -> bool {
        let tx = self.tx.lock().unwrap().clone();
        match tx {
            Some(tx) => tx.send(event).await.is_ok(),
            None => false,
        }
    }

    pub async fn touch(&self, path: impl Into<PathBuf>) -> bool {
        self.emit(ChangeEvent::new(ChangeKind::Modified, path)).await
    }
}

impl WatchBackend for ManualWatch {
    fn watch(&self, patterns: &[String], tx: mpsc::Sender<ChangeEvent>) -> Result<WatcherHandle> {
        *self.tx.lock().unwrap() = Some(tx);
        *self.patterns.lock().unwrap() = patterns.to_vec();
        self.registrations.fetch_add(1, Ordering::SeqCst);
        Ok(WatcherHandle::detached())
    }
}

/// Watch backend that can never be established.
#[derive(Debug, Clone, Default)]
pub struct FailingWatch;

impl WatchBackend for FailingWatch {
    fn watch(&self, _patterns: &[String], _tx: mpsc::Sender<ChangeEvent>) -> Result<WatcherHandle> {
        Err(WatchglobError::Other(anyhow!("watch primitive unavailable")))
    }
}

#[derive(Debug, Default)]
struct GateState {
    closed: bool,
    waiting: usize,
}

/// Blocking barrier a fake passes through on every call.
///
/// Open by default. While closed, callers park in [`Gate::pass`] until the
/// test opens it again.
#[derive(Debug, Clone, Default)]
pub struct Gate {
    inner: Arc<(Mutex<GateState>, Condvar)>,
}

impl Gate {
    pub fn close(&self) {
        self.inner.0.lock().unwrap().closed = true;
    }

    pub fn open(&self) {
        let (state, cvar) = &*self.inner;
        state.lock().unwrap().closed = false;
        cvar.notify_all();
    }

    /// Number of callers currently parked at the gate.
    pub fn waiting(&self) -> usize {
        self.inner.0.lock().unwrap().waiting
    }

    pub fn pass(&self) {
        let (state, cvar) = &*self.inner;
        let mut guard = state.lock().unwrap();
        guard.waiting += 1;
        while guard.closed {
            guard = cvar.wait(guard).unwrap();
        }
        guard.waiting -= 1;
    }
}

/// Expander answering from a table the test edits between passes.
///
/// Unknown patterns expand to nothing; patterns marked failing return an
/// error. Every call passes through [`ScriptedExpander::gate`] first.
#[derive(Debug, Clone, Default)]
pub struct ScriptedExpander {
    results: Arc<Mutex<HashMap<String, Vec<PathBuf>>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    calls: Arc<AtomicUsize>,
    gate: Gate,
}

impl ScriptedExpander {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, pattern: &str, paths: &[&str]) {
        self.results
            .lock()
            .unwrap()
            .insert(pattern.to_string(), paths.iter().map(PathBuf::from).collect());
    }

    pub fn fail(&self, pattern: &str) {
        self.failing.lock().unwrap().insert(pattern.to_string());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn gate(&self) -> &Gate {
        &self.gate
    }
}

impl Expander for ScriptedExpander {
    fn expand(&self, pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.pass();
        if self.failing.lock().unwrap().contains(pattern) {
            return Err(anyhow!("scripted expansion failure for {pattern}"));
        }
        Ok(self
            .results
            .lock()
            .unwrap()
            .get(pattern)
            .cloned()
            .unwrap_or_default())
    }
}

/// Loader that synthesises resources from paths and records every load.
///
/// `data` is `"<path>#<version>"`, where the version is bumped by
/// [`StubLoader::bump`]; paths marked failing return an error.
#[derive(Debug, Clone, Default)]
pub struct StubLoader {
    loaded: Arc<Mutex<Vec<PathBuf>>>,
    failing: Arc<Mutex<HashSet<PathBuf>>>,
    version: Arc<AtomicUsize>,
}

impl StubLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loaded(&self) -> Vec<PathBuf> {
        self.loaded.lock().unwrap().clone()
    }

    pub fn fail(&self, path: impl Into<PathBuf>) {
        self.failing.lock().unwrap().insert(path.into());
    }

    pub fn heal(&self, path: &Path) {
        self.failing.lock().unwrap().remove(path);
    }

    pub fn bump(&self) {
        self.version.fetch_add(1, Ordering::SeqCst);
    }
}

impl ResourceLoader for StubLoader {
    fn load(&self, path: &Path) -> anyhow::Result<Resource> {
        self.loaded.lock().unwrap().push(path.to_path_buf());
        if self.failing.lock().unwrap().contains(path) {
            return Err(anyhow!("scripted load failure for {}", path.display()));
        }
        let version = self.version.load(Ordering::SeqCst);
        Ok(Resource::new()
            .with_path(path)
            .with_data(format!("{}#{version}", path.display())))
    }
}
