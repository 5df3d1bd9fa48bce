// src/engine/event_handlers.rs

//! Pass outcome handling for the core state machine.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::engine::{Emission, StageState};
use crate::errors::{Result, WatchglobError};
use crate::resource::Resource;
use crate::types::Trigger;

/// Decision returned by the core after handling one pass outcome.
#[derive(Debug)]
pub struct StageStep {
    /// What to push downstream, if anything.
    pub output: Option<Result<Emission>>,
    /// Whether the outer runtime loop should keep listening for changes.
    pub keep_running: bool,
}

impl StageStep {
    fn stop() -> Self {
        Self {
            output: None,
            keep_running: false,
        }
    }
}

/// Upstream resources first, in their original order, then the resolved
/// ones in pass order.
pub fn merge(upstream: &[Arc<Resource>], resolved: Vec<Arc<Resource>>) -> Vec<Arc<Resource>> {
    let mut combined = Vec::with_capacity(upstream.len() + resolved.len());
    combined.extend(upstream.iter().cloned());
    combined.extend(resolved);
    combined
}

/// Handle a successful resolution pass.
pub fn handle_pass_success(
    state: &mut StageState,
    next_generation: &mut u64,
    upstream: &[Arc<Resource>],
    trigger: Trigger,
    resolved: Vec<Arc<Resource>>,
) -> StageStep {
    if *state == StageState::Stopped {
        return StageStep::stop();
    }

    let generation = *next_generation;
    *next_generation += 1;
    *state = StageState::Watching;

    debug!(
        generation,
        upstream = upstream.len(),
        resolved = resolved.len(),
        "emitting combined resources"
    );

    StageStep {
        output: Some(Ok(Emission {
            generation,
            trigger,
            resources: merge(upstream, resolved),
        })),
        keep_running: true,
    }
}

/// Handle a failed resolution pass.
///
/// - A failed initial pass fails the activation.
/// - While watching, a systemic failure (bad pattern, expansion failure)
///   stops the stage; anything else (e.g. one file failed to load) is
///   reported and the stage keeps listening.
pub fn handle_pass_failure(
    state: &mut StageState,
    trigger: Trigger,
    err: WatchglobError,
) -> StageStep {
    match *state {
        StageState::Stopped => StageStep::stop(),
        StageState::Initial => {
            warn!(error = %err, "initial resolution failed");
            *state = StageState::Stopped;
            StageStep {
                output: Some(Err(err)),
                keep_running: false,
            }
        }
        StageState::Watching => {
            let systemic = err.is_systemic();
            warn!(%trigger, error = %err, systemic, "re-resolution failed");
            if systemic {
                *state = StageState::Stopped;
            }
            StageStep {
                output: Some(Err(err)),
                keep_running: !systemic,
            }
        }
    }
}
