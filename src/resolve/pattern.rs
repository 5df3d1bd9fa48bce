// src/resolve/pattern.rs

//! Lexical helpers for glob pattern strings.
//!
//! Patterns are handled as `/`-separated strings rather than `Path`s so that
//! glob syntax (`*`, `{a,b}`, ...) is never reinterpreted.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};

use crate::errors::{Result, WatchglobError};

const GLOB_META: &[char] = &['*', '?', '[', '{'];

/// Returns true if `segment` contains glob syntax.
pub fn is_glob_segment(segment: &str) -> bool {
    segment.contains(GLOB_META)
}

/// Convert a path into a forward-slash string.
pub fn slash_str(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Join `pattern` under `dir`, unless `pattern` is already absolute.
pub fn join_under(dir: &str, pattern: &str) -> String {
    if dir.is_empty() || pattern.starts_with('/') {
        return pattern.to_string();
    }
    if pattern.is_empty() {
        return dir.to_string();
    }
    format!("{}/{}", dir.trim_end_matches('/'), pattern)
}

/// Remove `.` segments, fold `..` into its parent and collapse repeated
/// separators. Leading `..` segments of a relative pattern are kept.
pub fn normalize(pattern: &str) -> String {
    let absolute = pattern.starts_with('/');
    let mut out: Vec<&str> = Vec::new();

    for segment in pattern.split('/') {
        match segment {
            "" | "." => {}
            ".." => match out.last() {
                Some(&last) if last != ".." => {
                    out.pop();
                }
                _ if absolute => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }

    let joined = out.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Resolve `pattern` against `root` and normalise it.
pub fn absolutize(root: &Path, pattern: &str) -> String {
    normalize(&join_under(&slash_str(root), pattern))
}

/// A pattern split into its literal directory prefix and glob remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternParts {
    /// Longest leading run of segments without glob syntax.
    pub base: PathBuf,
    /// Number of segments after `base`, or `None` if the remainder contains
    /// `**` and may match at any depth.
    pub depth: Option<usize>,
    /// True when the pattern contains no glob syntax at all.
    pub literal: bool,
}

impl PatternParts {
    /// Split an absolute, normalised pattern.
    pub fn split(pattern: &str) -> Self {
        let segments: Vec<&str> = pattern.split('/').collect();
        let first_glob = segments.iter().position(|s| is_glob_segment(s));

        let Some(idx) = first_glob else {
            return Self {
                base: PathBuf::from(pattern),
                depth: Some(0),
                literal: true,
            };
        };

        let base = match segments[..idx].join("/") {
            b if b.is_empty() && pattern.starts_with('/') => "/".to_string(),
            b if b.is_empty() => ".".to_string(),
            b => b,
        };
        let rest = &segments[idx..];
        let depth = if rest.iter().any(|s| s.contains("**")) {
            None
        } else {
            Some(rest.len())
        };

        Self {
            base: PathBuf::from(base),
            depth,
            literal: false,
        }
    }

    /// Whether a watch on `base` needs to descend into subdirectories.
    pub fn spans_directories(&self) -> bool {
        !matches!(self.depth, Some(0) | Some(1))
    }
}

/// Compile a pattern the way expansion and watching match it: `*` and `?`
/// never cross a `/`, while `**` spans directories.
pub fn compile_matcher(pattern: &str) -> Result<GlobMatcher> {
    let glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| WatchglobError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
    Ok(glob.compile_matcher())
}
