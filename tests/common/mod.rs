#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use watchglob::engine::{Emission, StageContext};
use watchglob::fs::RealFileSystem;
use watchglob_test_utils::fakes::ManualWatch;

pub use watchglob_test_utils::{init_tracing, with_timeout};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// File names of an emission's resources, in emission order.
pub fn filenames(emission: &Emission) -> Vec<String> {
    emission
        .resources
        .iter()
        .filter_map(|r| r.filename().map(str::to_string))
        .collect()
}

/// Real filesystem under `root`, with change events injected by the test.
pub fn manual_context(root: &Path) -> (StageContext, ManualWatch) {
    let watch = ManualWatch::new();
    let ctx = StageContext::with_filesystem(root, Arc::new(RealFileSystem), Arc::new(watch.clone()));
    (ctx, watch)
}
