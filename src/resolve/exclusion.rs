// src/resolve/exclusion.rs

//! Exclusion matching against absolute resource paths.

use std::fmt;
use std::path::Path;

use globset::GlobMatcher;

use crate::errors::Result;
use crate::resolve::pattern::compile_matcher;

/// A single compiled pattern that can be tested against absolute paths.
#[derive(Clone)]
pub struct PathMatcher {
    pattern: String,
    matcher: GlobMatcher,
}

impl fmt::Debug for PathMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PathMatcher").field(&self.pattern).finish()
    }
}

impl PathMatcher {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: pattern.to_string(),
            matcher: compile_matcher(pattern)?,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_match(&self, path: &Path) -> bool {
        self.matcher.is_match(path)
    }
}

/// Drops paths that match any of a fixed set of absolute patterns.
///
/// Patterns are compiled once when the filter is built and then shared by
/// every pass that uses it.
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    matchers: Vec<PathMatcher>,
}

impl ExclusionFilter {
    /// Filter that admits every path.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let matchers = patterns
            .iter()
            .map(|p| PathMatcher::new(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { matchers })
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.matchers.iter().map(PathMatcher::pattern)
    }

    /// True if `path` matches none of the exclusion patterns.
    pub fn admits(&self, path: &Path) -> bool {
        !self.matchers.iter().any(|m| m.is_match(path))
    }

    /// The first exclusion pattern matching `path`, if any.
    pub fn excluded_by(&self, path: &Path) -> Option<&str> {
        self.matchers
            .iter()
            .find(|m| m.is_match(path))
            .map(PathMatcher::pattern)
    }
}
