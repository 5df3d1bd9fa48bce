// src/engine/runtime.rs

use std::fmt;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::engine::core::StageCore;
use crate::engine::{Emission, StageState};
use crate::errors::{Result, WatchglobError};
use crate::resolve::PatternResolver;
use crate::types::{ChangeEvent, Trigger};
use crate::watch::WatcherHandle;

/// Async shell around [`StageCore`] for the watching state.
///
/// Reads change events one at a time, runs a full resolution pass for each
/// and pushes the resulting emission downstream, so emissions leave in the
/// same order as their triggers arrived.
pub(crate) struct StageRuntime {
    pub(crate) core: StageCore,
    pub(crate) resolver: PatternResolver,
    pub(crate) events_rx: mpsc::Receiver<ChangeEvent>,
    /// Keeps the change channel open even if the watch backend gave up, so
    /// the stage only ends when it is stopped.
    pub(crate) _events_tx: mpsc::Sender<ChangeEvent>,
    pub(crate) output_tx: mpsc::Sender<Result<Emission>>,
    pub(crate) shutdown_rx: watch::Receiver<bool>,
    pub(crate) watcher: WatcherHandle,
}

impl fmt::Debug for StageRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageRuntime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl StageRuntime {
    fn stopped(&self) -> bool {
        *self.shutdown_rx.borrow() || self.output_tx.is_closed()
    }

    /// Main event loop.
    pub(crate) async fn run(mut self) {
        info!(patterns = ?self.resolver.patterns(), "glob stage watching");

        loop {
            let event = tokio::select! {
                biased;
                _ = self.shutdown_rx.changed() => break,
                event = self.events_rx.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
            };

            info!(kind = %event.kind, path = ?event.path, "change detected; re-resolving");
            let outcome = self.resolver.resolve_all().await;

            // The pass is allowed to finish, but its result must not reach a
            // consumer that has already gone away.
            if self.stopped() {
                debug!("stage stopped during resolution; discarding result");
                break;
            }

            let step = self.core.step(Trigger::Change(event), outcome);
            if let Some(output) = step.output {
                if self.output_tx.send(output).await.is_err() {
                    debug!("output receiver closed");
                    break;
                }
            }
            if !step.keep_running {
                info!("stage stopped after a systemic failure");
                break;
            }
        }

        self.core.stop();
        self.watcher.close();
        info!("glob stage stopped");
    }
}

/// Consumer side of a running stage.
///
/// Dropping the handle tears the stage down: the watch is released once any
/// in-flight pass has finished, and that pass emits nothing.
pub struct StageHandle {
    outputs: mpsc::Receiver<Result<Emission>>,
    shutdown: Option<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
}

impl fmt::Debug for StageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageHandle")
            .field("watching", &self.is_watching())
            .finish_non_exhaustive()
    }
}

impl StageHandle {
    pub(crate) fn watching(
        outputs: mpsc::Receiver<Result<Emission>>,
        shutdown: watch::Sender<bool>,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            outputs,
            shutdown: Some(shutdown),
            task: Some(task),
        }
    }

    /// Handle for a one-shot stage whose only output is already queued.
    pub(crate) fn finished(outputs: mpsc::Receiver<Result<Emission>>) -> Self {
        Self {
            outputs,
            shutdown: None,
            task: None,
        }
    }

    /// Whether the stage is still listening for changes.
    pub fn is_watching(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn state(&self) -> StageState {
        if self.is_watching() {
            StageState::Watching
        } else {
            StageState::Stopped
        }
    }

    /// Wait for the next emission.
    ///
    /// Returns `None` once the stage has stopped and every queued emission
    /// has been consumed.
    pub async fn next(&mut self) -> Option<Result<Emission>> {
        self.outputs.recv().await
    }

    /// Next emission if one is already queued.
    pub fn try_next(&mut self) -> Option<Result<Emission>> {
        self.outputs.try_recv().ok()
    }

    /// Tear the stage down and wait for the worker to finish.
    ///
    /// A pass already running is allowed to complete, but its result is
    /// discarded. Emissions queued before the stop can still be read with
    /// [`StageHandle::next`], which then returns `None`. Calling `stop`
    /// again is a no-op.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(true);
        }

        if let Some(task) = self.task.take() {
            task.await
                .map_err(|err| WatchglobError::Task(format!("stage worker failed: {err}")))?;
        }
        Ok(())
    }
}

impl Drop for StageHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(true);
        }
    }
}
