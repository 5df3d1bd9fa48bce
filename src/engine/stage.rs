// src/engine/stage.rs

use std::path::Path;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use crate::engine::context::StageContext;
use crate::engine::core::StageCore;
use crate::engine::runtime::{StageHandle, StageRuntime};
use crate::engine::Emission;
use crate::errors::{Result, WatchglobError};
use crate::resolve::pattern::absolutize;
use crate::resolve::{ExclusionFilter, PatternResolver};
use crate::resource::Resource;
use crate::scope::ScopeConfig;
use crate::types::{ChangeEvent, Trigger};
use crate::watch::WatcherHandle;

/// A configured glob stage: scope plus the prefixed literal patterns.
///
/// Built by [`Glob::pattern`](crate::scope::Glob::pattern) or
/// [`glob`](crate::scope::glob). The stage itself holds no runtime state; each
/// call to [`GlobStage::start`] activates an independent run.
#[derive(Debug, Clone)]
pub struct GlobStage {
    scope: Arc<ScopeConfig>,
    patterns: Vec<String>,
}

impl GlobStage {
    pub(crate) fn new(scope: Arc<ScopeConfig>, patterns: Vec<String>) -> Self {
        Self { scope, patterns }
    }

    /// Patterns after the scope's prefix chain, still relative to the root.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn scope(&self) -> &ScopeConfig {
        &self.scope
    }

    pub fn absolute_patterns(&self, root: &Path) -> Vec<String> {
        self.patterns.iter().map(|p| absolutize(root, p)).collect()
    }

    pub fn absolute_exclusions(&self, root: &Path) -> Vec<String> {
        self.scope
            .exclusions()
            .iter()
            .map(|p| absolutize(root, p))
            .collect()
    }

    /// Compile the resolver for this stage under `ctx`.
    pub fn resolver(&self, ctx: &StageContext) -> Result<PatternResolver> {
        let exclusions = ExclusionFilter::new(self.absolute_exclusions(ctx.root()).as_slice())?;
        let resolver = PatternResolver::new(
            self.absolute_patterns(ctx.root()),
            exclusions,
            Arc::clone(ctx.expander()),
            Arc::clone(ctx.loader()),
        )?;
        Ok(resolver.with_capacity(ctx.options().channel_capacity))
    }

    /// Resolve once, without watching: upstream resources followed by the
    /// resolved ones.
    pub async fn resolve_once(
        &self,
        ctx: &StageContext,
        upstream: impl IntoIterator<Item = Arc<Resource>>,
    ) -> Result<Vec<Arc<Resource>>> {
        let resolver = self.resolver(ctx)?;
        let mut core = StageCore::new(upstream.into_iter().collect());
        let outcome = resolver.resolve_all().await;
        initial_emission(core.step(Trigger::Initial, outcome).output).map(|e| e.resources)
    }

    /// Activate the stage.
    ///
    /// Runs the initial pass and queues its emission as the first output. A
    /// failing initial pass fails activation and nothing is emitted. Unless
    /// watching is disabled in the context options, the stage then re-emits on
    /// every change until the returned handle is stopped or dropped.
    ///
    /// The watch is registered before the initial pass so that changes made
    /// while it runs still trigger a re-emission.
    pub async fn start(
        &self,
        ctx: &StageContext,
        upstream: impl IntoIterator<Item = Arc<Resource>>,
    ) -> Result<StageHandle> {
        let options = ctx.options();
        let capacity = options.channel_capacity.max(1);
        let resolver = self.resolver(ctx)?;

        let (events_tx, events_rx) = mpsc::channel::<ChangeEvent>(capacity);
        let watcher = if options.watch {
            match ctx.watch_backend().watch(resolver.patterns(), events_tx.clone()) {
                Ok(handle) => handle,
                Err(err) => {
                    warn!(error = %err, "could not establish file watch; live updates disabled");
                    WatcherHandle::detached()
                }
            }
        } else {
            WatcherHandle::detached()
        };

        let mut core = StageCore::new(upstream.into_iter().collect());
        let outcome = resolver.resolve_all().await;
        let initial = initial_emission(core.step(Trigger::Initial, outcome).output)?;
        info!(resources = initial.len(), "initial resolution complete");

        let (output_tx, output_rx) = mpsc::channel::<Result<Emission>>(capacity);
        output_tx
            .send(Ok(initial))
            .await
            .map_err(|_| WatchglobError::Task("output channel closed".to_string()))?;

        if !options.watch {
            info!("watching disabled; stage emits once");
            return Ok(StageHandle::finished(output_rx));
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let runtime = StageRuntime {
            core,
            resolver,
            events_rx,
            _events_tx: events_tx,
            output_tx,
            shutdown_rx,
            watcher,
        };
        let task = tokio::spawn(runtime.run());

        Ok(StageHandle::watching(output_rx, shutdown_tx, task))
    }
}

fn initial_emission(output: Option<Result<Emission>>) -> Result<Emission> {
    match output {
        Some(result) => result,
        None => Err(WatchglobError::Task(
            "initial pass produced no output".to_string(),
        )),
    }
}
