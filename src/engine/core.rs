// src/engine/core.rs

//! Pure stage state machine.
//!
//! [`StageCore`] consumes pass outcomes and produces the next emission plus
//! whether the stage should keep running. It has no channels, no Tokio types
//! and performs no IO, so it can be tested synchronously.

use std::sync::Arc;

use crate::engine::event_handlers::{handle_pass_failure, handle_pass_success, StageStep};
use crate::engine::StageState;
use crate::errors::Result;
use crate::resource::Resource;
use crate::types::Trigger;

#[derive(Debug)]
pub struct StageCore {
    state: StageState,
    /// Captured once at activation; never re-fetched.
    upstream: Arc<[Arc<Resource>]>,
    next_generation: u64,
}

impl StageCore {
    pub fn new(upstream: Vec<Arc<Resource>>) -> Self {
        Self {
            state: StageState::Initial,
            upstream: upstream.into(),
            next_generation: 0,
        }
    }

    pub fn state(&self) -> StageState {
        self.state
    }

    pub fn upstream(&self) -> &[Arc<Resource>] {
        &self.upstream
    }

    /// Mark the stage as torn down; later outcomes are discarded.
    pub fn stop(&mut self) {
        self.state = StageState::Stopped;
    }

    /// Handle the outcome of one resolution pass.
    pub fn step(&mut self, trigger: Trigger, outcome: Result<Vec<Arc<Resource>>>) -> StageStep {
        match outcome {
            Ok(resolved) => handle_pass_success(
                &mut self.state,
                &mut self.next_generation,
                &self.upstream,
                trigger,
                resolved,
            ),
            Err(err) => handle_pass_failure(&mut self.state, trigger, err),
        }
    }
}
