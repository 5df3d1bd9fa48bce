// src/watch/event_handler.rs

//! Turning raw notify events into [`ChangeEvent`]s.

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind};
use tracing::debug;

use crate::types::{ChangeEvent, ChangeKind};
use crate::watch::path_utils::{rebase_event_path, RootAlias};
use crate::watch::patterns::WatchSet;

/// Classify the change for the `idx`-th path of an event.
///
/// Returns `None` for kinds that do not change file content or presence
/// (access, unknown "other" events).
pub fn classify(kind: &EventKind, idx: usize) -> Option<ChangeKind> {
    match kind {
        EventKind::Create(_) => Some(ChangeKind::Created),
        EventKind::Remove(_) => Some(ChangeKind::Deleted),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => Some(ChangeKind::Deleted),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => Some(ChangeKind::Created),
        // `Both` carries `[from, to]`.
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => Some(if idx == 0 {
            ChangeKind::Deleted
        } else {
            ChangeKind::Created
        }),
        EventKind::Modify(_) | EventKind::Any => Some(ChangeKind::Modified),
        EventKind::Access(_) | EventKind::Other => None,
    }
}

/// Keep only the paths of `event` that match the watched patterns.
pub fn filter_event(set: &WatchSet, roots: &[RootAlias], event: &Event) -> Vec<ChangeEvent> {
    let mut out = Vec::new();

    for (idx, raw) in event.paths.iter().enumerate() {
        let Some(kind) = classify(&event.kind, idx) else {
            continue;
        };

        let path = rebase_event_path(roots, raw);
        if !set.matches(&path) {
            debug!(?path, "change outside watched patterns ignored");
            continue;
        }
        out.push(ChangeEvent::new(kind, path));
    }

    out
}
