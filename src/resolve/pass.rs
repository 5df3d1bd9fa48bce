// src/resolve/pass.rs

//! One resolution pass: expand every pattern concurrently, merge the
//! per-pattern streams first-come-first-served, then deduplicate and apply
//! exclusions.

use std::path::Path;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::errors::{Result, WatchglobError};
use crate::resolve::dedup::Deduplicator;
use crate::resolve::exclusion::ExclusionFilter;
use crate::resolve::expand::Expander;
use crate::resolve::pattern::compile_matcher;
use crate::resource::{Resource, ResourceLoader};

/// Default bound for the per-pass merge channel.
pub const DEFAULT_PASS_CAPACITY: usize = 64;

type PassItem = Result<Arc<Resource>>;

/// Resolves a fixed list of absolute patterns into resources.
///
/// The resolver is immutable and cheap to clone; every call to
/// [`PatternResolver::resolve`] starts an independent pass with its own
/// [`Deduplicator`].
#[derive(Debug, Clone)]
pub struct PatternResolver {
    patterns: Arc<[String]>,
    exclusions: Arc<ExclusionFilter>,
    expander: Arc<dyn Expander>,
    loader: Arc<dyn ResourceLoader>,
    capacity: usize,
}

impl PatternResolver {
    /// Build a resolver for absolute, normalised `patterns`.
    ///
    /// Every pattern is compiled up front so that syntax errors surface here
    /// rather than halfway through a pass.
    pub fn new(
        patterns: Vec<String>,
        exclusions: ExclusionFilter,
        expander: Arc<dyn Expander>,
        loader: Arc<dyn ResourceLoader>,
    ) -> Result<Self> {
        for pattern in &patterns {
            compile_matcher(pattern)?;
        }
        Ok(Self {
            patterns: patterns.into(),
            exclusions: Arc::new(exclusions),
            expander,
            loader,
            capacity: DEFAULT_PASS_CAPACITY,
        })
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn exclusions(&self) -> &ExclusionFilter {
        &self.exclusions
    }

    /// Start a pass. Resources are produced lazily as the consumer pulls
    /// them from the returned [`ResolutionPass`].
    ///
    /// Must be called from within a Tokio runtime.
    pub fn resolve(&self) -> ResolutionPass {
        let (tx, rx) = mpsc::channel::<PassItem>(self.capacity);
        let seen = Arc::new(Mutex::new(Deduplicator::new()));

        let handles = self
            .patterns
            .iter()
            .map(|pattern| {
                let producer = Producer {
                    pattern: pattern.clone(),
                    expander: Arc::clone(&self.expander),
                    loader: Arc::clone(&self.loader),
                    exclusions: Arc::clone(&self.exclusions),
                    seen: Arc::clone(&seen),
                    tx: tx.clone(),
                };
                tokio::task::spawn_blocking(move || producer.run())
            })
            .collect();

        ResolutionPass {
            rx,
            handles,
            finished: false,
        }
    }

    /// Run a full pass and collect its resources.
    pub async fn resolve_all(&self) -> Result<Vec<Arc<Resource>>> {
        let resources = self.resolve().collect().await?;
        debug!(
            patterns = self.patterns.len(),
            resources = resources.len(),
            "resolution pass complete"
        );
        Ok(resources)
    }
}

/// Per-pattern worker running on the blocking pool.
struct Producer {
    pattern: String,
    expander: Arc<dyn Expander>,
    loader: Arc<dyn ResourceLoader>,
    exclusions: Arc<ExclusionFilter>,
    seen: Arc<Mutex<Deduplicator>>,
    tx: mpsc::Sender<PassItem>,
}

impl Producer {
    fn run(self) {
        let paths = match self.expander.expand(&self.pattern) {
            Ok(paths) => paths,
            Err(source) => {
                let _ = self.tx.blocking_send(Err(WatchglobError::Expand {
                    pattern: self.pattern.clone(),
                    source,
                }));
                return;
            }
        };

        for path in paths {
            match self.admit(&path) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(err) => {
                    let _ = self.tx.blocking_send(Err(err));
                    return;
                }
            }

            let item = self
                .loader
                .load(&path)
                .map(Arc::new)
                .map_err(|source| WatchglobError::Load {
                    path: path.clone(),
                    source,
                });
            let failed = item.is_err();

            if self.tx.blocking_send(item).is_err() {
                // Consumer dropped the pass; nothing left to do.
                debug!(pattern = %self.pattern, "resolution pass abandoned");
                return;
            }
            if failed {
                return;
            }
        }
    }

    /// Dedup first, then exclusions.
    fn admit(&self, path: &Path) -> Result<bool> {
        let first_sight = match self.seen.lock() {
            Ok(mut seen) => seen.admit(path),
            Err(_) => {
                return Err(WatchglobError::Task(
                    "deduplicator mutex poisoned".to_string(),
                ))
            }
        };
        if !first_sight {
            debug!(pattern = %self.pattern, ?path, "duplicate path dropped");
            return Ok(false);
        }

        if let Some(excluded_by) = self.exclusions.excluded_by(path) {
            debug!(pattern = %self.pattern, ?path, %excluded_by, "excluded path dropped");
            return Ok(false);
        }
        Ok(true)
    }
}

/// The lazy, finite output of one resolution pass.
///
/// Dropping a pass before it is drained stops its producers at their next
/// emission.
#[derive(Debug)]
pub struct ResolutionPass {
    rx: mpsc::Receiver<PassItem>,
    handles: Vec<JoinHandle<()>>,
    finished: bool,
}

impl ResolutionPass {
    /// Next resource of the pass, `None` once every pattern is exhausted.
    ///
    /// The first error ends the pass.
    pub async fn next(&mut self) -> Option<Result<Arc<Resource>>> {
        if self.finished {
            return None;
        }

        match self.rx.recv().await {
            Some(Ok(resource)) => Some(Ok(resource)),
            Some(Err(err)) => {
                self.finished = true;
                self.rx.close();
                Some(Err(err))
            }
            None => {
                self.finished = true;
                for handle in self.handles.drain(..) {
                    if let Err(err) = handle.await {
                        warn!(error = %err, "pattern worker failed");
                        return Some(Err(WatchglobError::Task(err.to_string())));
                    }
                }
                None
            }
        }
    }

    /// Drain the pass into a vector, failing on the first error.
    pub async fn collect(mut self) -> Result<Vec<Arc<Resource>>> {
        let mut out = Vec::new();
        while let Some(item) = self.next().await {
            out.push(item?);
        }
        Ok(out)
    }
}
