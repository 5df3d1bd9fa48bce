// src/scope.rs

//! Fluent scope configuration: `within` nesting and `exclude` accumulation.
//!
//! ```ignore
//! let scripts = Glob::root().within("test").within("files");
//! let stage = scripts.exclude("concatenated.js").pattern("*.js");
//! ```
//!
//! Every call returns a new builder; the receiver is never modified, so
//! several builders can be derived from one base.

use std::path::Path;
use std::sync::Arc;

use crate::engine::GlobStage;
use crate::resolve::pattern::{join_under, slash_str};

/// Anything that can be flattened into an ordered list of pattern strings.
///
/// Single strings, vectors, arrays, slices and tuples nest freely:
/// `("a.js", vec!["b.js", "c.js"])` flattens to three patterns.
pub trait IntoPatterns {
    fn into_patterns(self) -> Vec<String>;
}

impl IntoPatterns for &str {
    fn into_patterns(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoPatterns for String {
    fn into_patterns(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoPatterns for &String {
    fn into_patterns(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl<T: IntoPatterns> IntoPatterns for Vec<T> {
    fn into_patterns(self) -> Vec<String> {
        self.into_iter().flat_map(IntoPatterns::into_patterns).collect()
    }
}

impl<T: IntoPatterns + Clone> IntoPatterns for &Vec<T> {
    fn into_patterns(self) -> Vec<String> {
        self.as_slice().into_patterns()
    }
}

impl<T: IntoPatterns + Clone> IntoPatterns for &[T] {
    fn into_patterns(self) -> Vec<String> {
        self.iter().cloned().flat_map(IntoPatterns::into_patterns).collect()
    }
}

impl<T: IntoPatterns, const N: usize> IntoPatterns for [T; N] {
    fn into_patterns(self) -> Vec<String> {
        self.into_iter().flat_map(IntoPatterns::into_patterns).collect()
    }
}

macro_rules! tuple_into_patterns {
    ($($name:ident),+) => {
        impl<$($name: IntoPatterns),+> IntoPatterns for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_patterns(self) -> Vec<String> {
                let ($($name,)+) = self;
                let mut out = Vec::new();
                $(out.extend($name.into_patterns());)+
                out
            }
        }
    };
}

tuple_into_patterns!(A, B);
tuple_into_patterns!(A, B, C);
tuple_into_patterns!(A, B, C, D);

/// Immutable prefix chain + exclusion list shared by everything built from
/// one builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeConfig {
    /// `within` directories in call order.
    prefix_chain: Vec<String>,
    /// Exclusion patterns, already prefixed by the chain in effect when they
    /// were added.
    exclusions: Vec<String>,
}

impl ScopeConfig {
    pub fn prefix_chain(&self) -> &[String] {
        &self.prefix_chain
    }

    pub fn exclusions(&self) -> &[String] {
        &self.exclusions
    }

    /// Apply the prefix chain to a literal pattern.
    ///
    /// The most recent `within` is joined first, so `within("a").within("b")`
    /// maps `*.js` to `a/b/*.js`.
    pub fn apply(&self, pattern: &str) -> String {
        self.prefix_chain
            .iter()
            .rev()
            .fold(pattern.to_string(), |acc, dir| join_under(dir, &acc))
    }

    fn within(&self, directory: &str) -> Self {
        let mut prefix_chain = self.prefix_chain.clone();
        prefix_chain.push(directory.to_string());
        Self {
            prefix_chain,
            exclusions: self.exclusions.clone(),
        }
    }

    fn exclude(&self, patterns: Vec<String>) -> Self {
        let mut exclusions = self.exclusions.clone();
        for pattern in patterns {
            let pattern = self.apply(&pattern);
            if !exclusions.contains(&pattern) {
                exclusions.push(pattern);
            }
        }
        Self {
            prefix_chain: self.prefix_chain.clone(),
            exclusions,
        }
    }
}

/// The glob builder.
///
/// [`Glob::pattern`] produces the pipeline stage; [`Glob::within`] and
/// [`Glob::exclude`] derive narrower builders.
///
/// Calling the builder directly, as `glob("*.js")`, is only available for
/// the root scope through the free function [`glob`], which is shorthand for
/// `Glob::root().pattern(..)`. Derived builders have no call form and always
/// go through `.pattern(..)`.
#[derive(Debug, Clone, Default)]
pub struct Glob {
    scope: Arc<ScopeConfig>,
}

impl Glob {
    /// Builder with an empty prefix chain and no exclusions.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn scope(&self) -> &ScopeConfig {
        &self.scope
    }

    /// New builder resolving everything under `directory`.
    pub fn within(&self, directory: impl AsRef<Path>) -> Glob {
        Glob {
            scope: Arc::new(self.scope.within(&slash_str(directory.as_ref()))),
        }
    }

    /// New builder that additionally drops resources matching `patterns`.
    pub fn exclude(&self, patterns: impl IntoPatterns) -> Glob {
        Glob {
            scope: Arc::new(self.scope.exclude(patterns.into_patterns())),
        }
    }

    /// Build the stage resolving `patterns` in this scope.
    pub fn pattern(&self, patterns: impl IntoPatterns) -> GlobStage {
        let literal = patterns
            .into_patterns()
            .iter()
            .map(|p| self.scope.apply(p))
            .collect();
        GlobStage::new(Arc::clone(&self.scope), literal)
    }
}

/// Resolve `patterns` in the root scope; same as `Glob::root().pattern(..)`.
pub fn glob(patterns: impl IntoPatterns) -> GlobStage {
    Glob::root().pattern(patterns)
}
