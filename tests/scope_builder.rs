mod common;
use crate::common::init_tracing;

use std::path::Path;

use watchglob::scope::{glob, Glob};

#[test]
fn pattern_without_scope_is_unchanged() {
    init_tracing();

    let stage = glob("test/files/*.js");
    assert_eq!(stage.patterns(), ["test/files/*.js"]);
    assert!(stage.scope().prefix_chain().is_empty());
    assert!(stage.scope().exclusions().is_empty());
}

#[test]
fn calling_glob_directly_matches_root_pattern() {
    let direct = glob(["a.js", "b.js"]);
    let via_builder = Glob::root().pattern(["a.js", "b.js"]);
    assert_eq!(direct.patterns(), via_builder.patterns());
    assert_eq!(direct.scope(), via_builder.scope());
}

#[test]
fn nested_within_joins_outer_then_inner() {
    let stage = Glob::root().within("test").within("files").pattern("*.js");
    assert_eq!(stage.patterns(), ["test/files/*.js"]);
    assert_eq!(stage.scope().prefix_chain(), ["test", "files"]);
}

#[test]
fn within_accepts_paths() {
    let stage = Glob::root().within(Path::new("test/files")).pattern("*.js");
    assert_eq!(stage.patterns(), ["test/files/*.js"]);
}

#[test]
fn absolute_patterns_are_not_prefixed() {
    let stage = Glob::root().within("test").pattern("/abs/*.js");
    assert_eq!(stage.patterns(), ["/abs/*.js"]);
}

#[test]
fn arguments_are_flattened_in_order() {
    let stage = glob(("a.js", vec!["b.js", "c.js"], ["d.js"]));
    assert_eq!(stage.patterns(), ["a.js", "b.js", "c.js", "d.js"]);

    let owned = vec!["x.js".to_string(), "y.js".to_string()];
    let stage = glob(&owned);
    assert_eq!(stage.patterns(), ["x.js", "y.js"]);
}

#[test]
fn zero_patterns_are_allowed() {
    let stage = glob(Vec::<String>::new());
    assert!(stage.patterns().is_empty());
}

#[test]
fn duplicate_patterns_are_kept() {
    let stage = glob(["a.js", "a.js"]);
    assert_eq!(stage.patterns().len(), 2);
}

#[test]
fn exclude_is_prefixed_by_current_scope() {
    let scoped = Glob::root().within("test").within("files");
    let stage = scoped.exclude("concatenated.js").pattern("*.js");
    assert_eq!(stage.scope().exclusions(), ["test/files/concatenated.js"]);
}

#[test]
fn exclusions_survive_later_within() {
    let stage = Glob::root()
        .exclude("vendor/*.js")
        .within("src")
        .exclude("*.min.js")
        .pattern("*.js");

    assert_eq!(stage.scope().exclusions(), ["vendor/*.js", "src/*.min.js"]);
    assert_eq!(stage.patterns(), ["src/*.js"]);
}

#[test]
fn builders_are_never_mutated() {
    let base = Glob::root().within("test");
    let narrowed = base.within("files");
    let excluding = base.exclude("skip.js");

    assert_eq!(base.scope().prefix_chain(), ["test"]);
    assert!(base.scope().exclusions().is_empty());

    assert_eq!(narrowed.scope().prefix_chain(), ["test", "files"]);
    assert!(narrowed.scope().exclusions().is_empty());

    assert_eq!(excluding.scope().prefix_chain(), ["test"]);
    assert_eq!(excluding.scope().exclusions(), ["test/skip.js"]);

    // Two stages from one base stay independent.
    let a = base.pattern("a.js");
    let b = base.pattern("b.js");
    assert_eq!(a.patterns(), ["test/a.js"]);
    assert_eq!(b.patterns(), ["test/b.js"]);
}

#[test]
fn repeated_exclusions_are_stored_once() {
    let stage = Glob::root()
        .exclude("a.js")
        .exclude(["a.js", "b.js"])
        .pattern("*.js");
    assert_eq!(stage.scope().exclusions(), ["a.js", "b.js"]);
}

#[test]
fn absolute_patterns_resolve_against_root() {
    let stage = Glob::root()
        .within("test")
        .exclude("../skip/*.js")
        .pattern(["./files/*.js", "../other.js"]);

    let root = Path::new("/project");
    assert_eq!(
        stage.absolute_patterns(root),
        ["/project/test/files/*.js", "/project/other.js"]
    );
    assert_eq!(stage.absolute_exclusions(root), ["/project/skip/*.js"]);
}
