mod common;
use crate::common::init_tracing;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use watchglob::engine::{StageCore, StageState};
use watchglob::errors::WatchglobError;
use watchglob::resource::Resource;
use watchglob::types::{ChangeEvent, ChangeKind, Trigger};

fn res(path: &str) -> Arc<Resource> {
    Arc::new(Resource::new().with_path(path).with_data(path))
}

fn change(path: &str) -> Trigger {
    Trigger::Change(ChangeEvent::new(ChangeKind::Modified, path))
}

fn load_error(path: &str) -> WatchglobError {
    WatchglobError::Load {
        path: PathBuf::from(path),
        source: anyhow!("permission denied"),
    }
}

fn expand_error() -> WatchglobError {
    WatchglobError::Expand {
        pattern: "/p/*".to_string(),
        source: anyhow!("io failure"),
    }
}

#[test]
fn initial_success_merges_upstream_first() {
    init_tracing();
    let upstream = vec![res("/up/1"), res("/up/2")];
    let mut core = StageCore::new(upstream.clone());
    assert_eq!(core.state(), StageState::Initial);

    let step = core.step(Trigger::Initial, Ok(vec![res("/p/a")]));
    assert!(step.keep_running);
    assert_eq!(core.state(), StageState::Watching);

    let emission = match step.output {
        Some(Ok(e)) => e,
        other => panic!("expected emission, got {other:?}"),
    };
    assert_eq!(emission.generation, 0);
    assert_eq!(emission.len(), 3);
    assert!(Arc::ptr_eq(&emission.resources[0], &upstream[0]));
    assert!(Arc::ptr_eq(&emission.resources[1], &upstream[1]));
    assert_eq!(emission.resources[2].path(), Some(std::path::Path::new("/p/a")));
}

#[test]
fn generations_increase_per_successful_pass() {
    let mut core = StageCore::new(Vec::new());
    let mut generations = Vec::new();

    for trigger in [Trigger::Initial, change("/p/a"), change("/p/b")] {
        if let Some(Ok(e)) = core.step(trigger, Ok(Vec::new())).output {
            generations.push(e.generation);
        }
    }
    assert_eq!(generations, [0, 1, 2]);
}

#[test]
fn empty_result_still_emits_upstream() {
    let upstream = vec![res("/up/1")];
    let mut core = StageCore::new(upstream);
    core.step(Trigger::Initial, Ok(vec![res("/p/a")]));

    let step = core.step(change("/p/a"), Ok(Vec::new()));
    match step.output {
        Some(Ok(e)) => {
            assert_eq!(e.len(), 1);
            assert_eq!(e.resources[0].path(), Some(std::path::Path::new("/up/1")));
        }
        other => panic!("expected emission, got {other:?}"),
    }
}

#[test]
fn initial_failure_stops() {
    let mut core = StageCore::new(Vec::new());
    let step = core.step(Trigger::Initial, Err(load_error("/p/a")));

    assert!(matches!(step.output, Some(Err(WatchglobError::Load { .. }))));
    assert!(!step.keep_running);
    assert_eq!(core.state(), StageState::Stopped);
}

#[test]
fn local_failure_while_watching_keeps_running() {
    let mut core = StageCore::new(Vec::new());
    core.step(Trigger::Initial, Ok(Vec::new()));

    let step = core.step(change("/p/a"), Err(load_error("/p/a")));
    assert!(matches!(step.output, Some(Err(_))));
    assert!(step.keep_running);
    assert_eq!(core.state(), StageState::Watching);

    // A failed pass does not consume a generation.
    match core.step(change("/p/a"), Ok(Vec::new())).output {
        Some(Ok(e)) => assert_eq!(e.generation, 1),
        other => panic!("expected emission, got {other:?}"),
    }
}

#[test]
fn systemic_failure_while_watching_stops() {
    let mut core = StageCore::new(Vec::new());
    core.step(Trigger::Initial, Ok(Vec::new()));

    let step = core.step(change("/p/a"), Err(expand_error()));
    assert!(matches!(step.output, Some(Err(WatchglobError::Expand { .. }))));
    assert!(!step.keep_running);
    assert_eq!(core.state(), StageState::Stopped);
}

#[test]
fn stopped_core_discards_outcomes() {
    let mut core = StageCore::new(vec![res("/up/1")]);
    core.step(Trigger::Initial, Ok(Vec::new()));
    core.stop();

    let step = core.step(change("/p/a"), Ok(vec![res("/p/a")]));
    assert!(step.output.is_none());
    assert!(!step.keep_running);

    let step = core.step(change("/p/a"), Err(expand_error()));
    assert!(step.output.is_none());
    assert_eq!(core.upstream().len(), 1);
}

#[test]
fn error_classification() {
    assert!(expand_error().is_systemic());
    assert!(WatchglobError::Task("join".into()).is_systemic());
    assert!(!load_error("/p/a").is_systemic());
    assert!(!WatchglobError::Io(std::io::Error::other("disk")).is_systemic());
}
