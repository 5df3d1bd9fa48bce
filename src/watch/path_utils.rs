// src/watch/path_utils.rs

//! Utility functions for path handling in the watcher.

use std::path::{Path, PathBuf};

/// A watched directory together with its canonical spelling.
#[derive(Debug, Clone)]
pub struct RootAlias {
    pub given: PathBuf,
    pub canonical: Option<PathBuf>,
}

impl RootAlias {
    pub fn new(given: impl Into<PathBuf>) -> Self {
        let given = given.into();
        let canonical = given.canonicalize().ok().filter(|c| *c != given);
        Self { given, canonical }
    }
}

/// Rewrite an event path onto the spelling used by the patterns.
///
/// Some platforms (notably macOS) report events under a different absolute
/// prefix than the one that was watched (`/private/var/...` vs `/var/...`).
/// Deleted files can no longer be canonicalised, so we swap prefixes instead.
pub fn rebase_event_path(roots: &[RootAlias], path: &Path) -> PathBuf {
    for root in roots {
        if path.starts_with(&root.given) {
            return path.to_path_buf();
        }
    }
    for root in roots {
        if let Some(canonical) = &root.canonical {
            if let Ok(rel) = path.strip_prefix(canonical) {
                return root.given.join(rel);
            }
        }
    }
    path.to_path_buf()
}
