// src/engine/mod.rs

//! The glob pipeline stage.
//!
//! This module ties together:
//! - the resolver (one full pass per trigger)
//! - the watcher (change events that trigger re-resolution)
//! - the upstream resources captured at activation
//!
//! The pure state machine that merges and numbers emissions lives in
//! [`core`]; the async shell that reacts to change events is implemented in
//! [`runtime`].

use std::path::Path;
use std::sync::Arc;

use crate::resource::Resource;
use crate::types::Trigger;

/// Lifecycle of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    /// Not yet activated; the initial pass has not completed.
    Initial,
    /// Initial output emitted; re-emitting on every change.
    Watching,
    /// Torn down or failed; no further output.
    Stopped,
}

/// One combined output of the stage: upstream resources followed by the
/// resources of one resolution pass.
#[derive(Debug, Clone)]
pub struct Emission {
    /// 0 for the initial emission, then one more per re-emission.
    pub generation: u64,
    pub trigger: Trigger,
    pub resources: Vec<Arc<Resource>>,
}

impl Emission {
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Paths of all resources that have one, in emission order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.resources.iter().filter_map(|r| r.path())
    }
}

/// Runtime options for a stage.
#[derive(Debug, Clone, Copy)]
pub struct StageOptions {
    /// If false, the stage emits once and never watches (one-shot mode).
    pub watch: bool,
    /// Bound for the change-event and output channels.
    pub channel_capacity: usize,
}

impl Default for StageOptions {
    fn default() -> Self {
        Self {
            watch: true,
            channel_capacity: 64,
        }
    }
}

pub mod context;
pub mod core;
pub mod event_handlers;
pub mod runtime;
pub mod stage;

pub use context::StageContext;
pub use self::core::StageCore;
pub use event_handlers::StageStep;
pub use runtime::StageHandle;
pub use stage::GlobStage;
