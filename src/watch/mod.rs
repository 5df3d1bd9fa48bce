// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Working out which directories to register for a set of patterns.
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Re-filtering raw notifications against the exact patterns and turning
//!   them into [`ChangeEvent`](crate::types::ChangeEvent)s.
//!
//! It does **not** resolve anything; the engine re-runs resolution when a
//! change arrives.

pub mod event_handler;
pub mod path_utils;
pub mod patterns;
pub mod watcher;

pub use event_handler::{classify, filter_event};
pub use patterns::{watch_roots, WatchRoot, WatchSet};
pub use watcher::{spawn_watcher, NotifyWatchBackend, WatchBackend, WatcherHandle};
