// src/resolve/mod.rs

//! Pattern resolution.
//!
//! This module is responsible for:
//! - Normalising pattern strings and splitting them into a literal base
//!   directory plus glob remainder ([`pattern`]).
//! - Expanding a pattern into matching files ([`expand`]).
//! - Per-pass path deduplication ([`dedup`]) and exclusion filtering
//!   ([`exclusion`]).
//! - Running a full, concurrent resolution pass ([`pass`]).
//!
//! It knows nothing about watching; the engine re-runs passes on change.

pub mod dedup;
pub mod exclusion;
pub mod expand;
pub mod pass;
pub mod pattern;

pub use dedup::Deduplicator;
pub use exclusion::{ExclusionFilter, PathMatcher};
pub use expand::{Expander, FsExpander};
pub use pass::{PatternResolver, ResolutionPass, DEFAULT_PASS_CAPACITY};
