// src/watch/patterns.rs

use std::fmt;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::errors::{Result, WatchglobError};
use crate::resolve::pattern::PatternParts;

/// Compiled set of the literal (absolute) patterns being watched.
///
/// The OS watch is registered per directory, so it reports more than the
/// patterns cover; every raw path is checked against this set before it
/// becomes a change event.
#[derive(Clone)]
pub struct WatchSet {
    patterns: Vec<String>,
    set: GlobSet,
}

impl fmt::Debug for WatchSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchSet")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl WatchSet {
    pub fn new(patterns: &[String]) -> Result<Self> {
        Ok(Self {
            patterns: patterns.to_vec(),
            set: build_globset(patterns)?,
        })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn matches(&self, path: &Path) -> bool {
        self.set.is_match(path)
    }
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let invalid = |pattern: &str| {
        let pattern = pattern.to_string();
        move |source: globset::Error| WatchglobError::InvalidPattern { pattern, source }
    };

    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = GlobBuilder::new(pat)
            .literal_separator(true)
            .build()
            .map_err(invalid(pat.as_str()))?;
        builder.add(glob);
    }
    builder.build().map_err(invalid(patterns.join(", ").as_str()))
}

/// A directory registered with the OS watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRoot {
    /// Directory as spelled by the patterns.
    pub path: PathBuf,
    pub recursive: bool,
}

/// Compute the minimal set of directories to watch for `patterns`.
///
/// - A literal file pattern watches its parent directory, non-recursively.
/// - A glob pattern watches its literal base directory, recursively only if
///   the glob part spans directories.
/// - A root already covered by a recursive ancestor (or an identical root)
///   is not registered again.
pub fn watch_roots(patterns: &[String]) -> Vec<WatchRoot> {
    let mut candidates: Vec<WatchRoot> = patterns
        .iter()
        .filter_map(|pattern| {
            let parts = PatternParts::split(pattern);
            if parts.literal {
                let parent = parts.base.parent()?.to_path_buf();
                Some(WatchRoot {
                    path: parent,
                    recursive: false,
                })
            } else {
                Some(WatchRoot {
                    recursive: parts.spans_directories(),
                    path: parts.base,
                })
            }
        })
        .collect();

    // Recursive roots first, shallowest first, so ancestors are kept before
    // the roots they cover.
    candidates.sort_by(|a, b| {
        b.recursive
            .cmp(&a.recursive)
            .then_with(|| a.path.components().count().cmp(&b.path.components().count()))
            .then_with(|| a.path.cmp(&b.path))
    });

    let mut roots: Vec<WatchRoot> = Vec::new();
    for candidate in candidates {
        let covered = roots.iter().any(|r| {
            (r.recursive && candidate.path.starts_with(&r.path))
                || (r.path == candidate.path && !candidate.recursive)
        });
        if !covered {
            roots.push(candidate);
        }
    }
    roots
}
