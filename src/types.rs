// src/types.rs

use std::fmt;
use std::path::PathBuf;

/// Kind of filesystem change reported by the watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Deleted,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeKind::Created => "created",
            ChangeKind::Modified => "modified",
            ChangeKind::Deleted => "deleted",
        };
        f.write_str(s)
    }
}

/// A filesystem change touching a path matched by the watched patterns.
///
/// The stage only uses this as a trigger; every event leads to a full
/// re-resolution regardless of its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub path: PathBuf,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// Why a resolution pass was run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// First activation of the stage.
    Initial,
    /// A watched file changed.
    Change(ChangeEvent),
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Initial => f.write_str("initial"),
            Trigger::Change(ev) => write!(f, "{} {}", ev.kind, ev.path.display()),
        }
    }
}
