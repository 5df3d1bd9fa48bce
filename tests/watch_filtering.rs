mod common;
use crate::common::{init_tracing, TestResult};

use std::path::{Path, PathBuf};

use notify::event::{AccessKind, CreateKind, ModifyKind, RemoveKind, RenameMode};
use notify::{Event, EventKind};
use watchglob::types::ChangeKind;
use watchglob::watch::path_utils::{rebase_event_path, RootAlias};
use watchglob::watch::{classify, filter_event, watch_roots, WatchRoot, WatchSet};

fn strings(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn root(path: &str, recursive: bool) -> WatchRoot {
    WatchRoot {
        path: PathBuf::from(path),
        recursive,
    }
}

fn event(kind: EventKind, paths: &[&str]) -> Event {
    let mut ev = Event::new(kind);
    for p in paths {
        ev = ev.add_path(PathBuf::from(p));
    }
    ev
}

#[test]
fn roots_follow_pattern_shape() {
    init_tracing();
    let roots = watch_roots(&strings(&["/p/src/*.js", "/p/lib/**/*.js", "/p/README.md"]));

    assert_eq!(
        roots,
        [
            root("/p/lib", true),
            root("/p", false),
            root("/p/src", false),
        ]
    );
}

#[test]
fn covered_roots_are_registered_once() {
    let roots = watch_roots(&strings(&[
        "/p/src/*.js",
        "/p/src/*.css",
        "/p/**/*.md",
        "/p/src/nested/x.js",
    ]));
    assert_eq!(roots, [root("/p", true)]);
}

#[test]
fn multi_segment_glob_watches_recursively() {
    let roots = watch_roots(&strings(&["/p/*/index.js"]));
    assert_eq!(roots, [root("/p", true)]);
}

#[test]
fn classify_maps_kinds() {
    assert_eq!(classify(&EventKind::Create(CreateKind::File), 0), Some(ChangeKind::Created));
    assert_eq!(classify(&EventKind::Remove(RemoveKind::File), 0), Some(ChangeKind::Deleted));
    assert_eq!(
        classify(&EventKind::Modify(ModifyKind::Any), 0),
        Some(ChangeKind::Modified)
    );
    let rename = EventKind::Modify(ModifyKind::Name(RenameMode::Both));
    assert_eq!(classify(&rename, 0), Some(ChangeKind::Deleted));
    assert_eq!(classify(&rename, 1), Some(ChangeKind::Created));
    assert_eq!(classify(&EventKind::Access(AccessKind::Any), 0), None);
}

#[test]
fn events_are_refiltered_against_patterns() -> TestResult {
    let set = WatchSet::new(&strings(&["/p/src/*.js"]))?;
    let aliases = vec![RootAlias::new("/p/src")];
    assert_eq!(set.patterns(), ["/p/src/*.js"]);

    let ev = event(
        EventKind::Create(CreateKind::File),
        &["/p/src/a.js", "/p/src/a.css", "/p/src/deep/b.js"],
    );
    let changes = filter_event(&set, &aliases, &ev);

    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].kind, ChangeKind::Created);
    assert_eq!(changes[0].path, Path::new("/p/src/a.js"));
    Ok(())
}

#[test]
fn access_events_are_ignored() -> TestResult {
    let set = WatchSet::new(&strings(&["/p/*.js"]))?;
    let ev = event(EventKind::Access(AccessKind::Any), &["/p/a.js"]);
    assert!(filter_event(&set, &[], &ev).is_empty());
    Ok(())
}

#[test]
fn canonical_event_paths_are_rebased() {
    let alias = RootAlias {
        given: PathBuf::from("/var/proj"),
        canonical: Some(PathBuf::from("/private/var/proj")),
    };
    let roots = [alias];

    assert_eq!(
        rebase_event_path(&roots, Path::new("/private/var/proj/a.js")),
        Path::new("/var/proj/a.js")
    );
    assert_eq!(
        rebase_event_path(&roots, Path::new("/var/proj/a.js")),
        Path::new("/var/proj/a.js")
    );
    assert_eq!(
        rebase_event_path(&roots, Path::new("/elsewhere/a.js")),
        Path::new("/elsewhere/a.js")
    );
}

#[test]
fn malformed_watch_pattern_is_rejected() {
    assert!(WatchSet::new(&strings(&["/p/[x"])).is_err());
}
