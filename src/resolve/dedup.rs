// src/resolve/dedup.rs

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Pass-local record of the paths already emitted.
///
/// A fresh instance is created for every resolution pass. Keeping it across
/// passes would hide a file that was deleted and then recreated.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<PathBuf>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true (and records `path`) the first time a path is offered.
    pub fn admit(&mut self, path: &Path) -> bool {
        if self.seen.contains(path) {
            return false;
        }
        self.seen.insert(path.to_path_buf())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
