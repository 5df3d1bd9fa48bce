mod common;
use crate::common::{init_tracing, TestResult};

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tempfile::NamedTempFile;
use watchglob::cli::{CliArgs, LogLevel};
use watchglob::config::{load_and_validate, load_from_path, resolve_root, RawConfigFile};
use watchglob::engine::{Emission, StageContext};
use watchglob::errors::WatchglobError;
use watchglob::logging::effective_level;
use watchglob::resource::Resource;
use watchglob::types::Trigger;
use watchglob::{apply_cli_overrides, format_emission};
use watchglob_test_utils::builders::ConfigFileBuilder;
use watchglob_test_utils::fixtures::js_fixture;

fn demo_config() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/glob.toml")
}

#[test]
fn demo_config_loads() -> TestResult {
    init_tracing();
    let cfg = load_and_validate(demo_config())?;

    assert_eq!(cfg.stage.within, ["test", "files"]);
    assert_eq!(cfg.stage.patterns, ["*.js"]);
    assert!(cfg.watch.enabled);
    assert_eq!(cfg.stage_options().channel_capacity, 32);

    let stage = cfg.glob().pattern(&cfg.stage.patterns);
    assert_eq!(stage.patterns(), ["test/files/*.js"]);
    assert_eq!(stage.scope().exclusions(), ["test/files/concatenated.js"]);
    Ok(())
}

#[tokio::test]
async fn demo_config_resolves_fixture() -> TestResult {
    let cfg = load_and_validate(demo_config())?;
    let dir = js_fixture();
    let ctx = StageContext::real(dir.path());

    let resources = cfg
        .glob()
        .pattern(&cfg.stage.patterns)
        .resolve_once(&ctx, Vec::new())
        .await?;
    let names: Vec<_> = resources.iter().filter_map(|r| r.filename()).collect();
    assert_eq!(names, ["file-1.js", "file-2.js"]);
    Ok(())
}

#[test]
fn empty_file_uses_defaults() -> TestResult {
    let file = NamedTempFile::new()?;
    let raw = load_from_path(file.path())?;

    assert!(raw.stage.patterns.is_empty());
    assert!(raw.stage.root.is_none());
    assert!(raw.watch.enabled);
    assert_eq!(raw.watch.channel_capacity, 64);
    Ok(())
}

#[test]
fn malformed_pattern_is_a_structured_error() -> TestResult {
    let mut file = NamedTempFile::new()?;
    write!(
        file,
        r#"
[stage]
patterns = ["src/[broken"]
"#
    )?;

    match load_and_validate(file.path()) {
        Err(WatchglobError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "src/[broken"),
        other => panic!("expected InvalidPattern, got {other:?}"),
    }
    Ok(())
}

#[test]
fn malformed_toml_is_reported() -> TestResult {
    let mut file = NamedTempFile::new()?;
    write!(file, "[stage\npatterns = 3")?;
    assert!(matches!(load_from_path(file.path()), Err(WatchglobError::Toml(_))));
    Ok(())
}

#[test]
fn missing_file_is_io_error() {
    assert!(matches!(
        load_from_path("/definitely/not/here.toml"),
        Err(WatchglobError::Io(_))
    ));
}

#[test]
fn zero_capacity_is_rejected() {
    let err = ConfigFileBuilder::new()
        .with_pattern("*.js")
        .with_channel_capacity(0)
        .try_build()
        .unwrap_err();
    assert!(matches!(err, WatchglobError::Config(ref msg) if msg.contains("channel_capacity")));
}

#[test]
fn blank_within_is_rejected() {
    let err = ConfigFileBuilder::new()
        .with_within(" ")
        .with_pattern("*.js")
        .try_build()
        .unwrap_err();
    assert!(matches!(err, WatchglobError::Config(_)));
}

#[test]
fn cli_flags_layer_on_top_of_file() -> TestResult {
    let mut raw: RawConfigFile = ConfigFileBuilder::new()
        .with_within("test")
        .with_pattern("*.js")
        .raw();
    let args = CliArgs::try_parse_from([
        "watchglob",
        "*.css",
        "--within",
        "files",
        "--exclude",
        "skip.js",
        "--root",
        "/srv/site",
        "--once",
    ])?;

    apply_cli_overrides(&mut raw, &args);
    assert_eq!(raw.stage.patterns, ["*.js", "*.css"]);
    assert_eq!(raw.stage.within, ["test", "files"]);
    assert_eq!(raw.stage.exclude, ["skip.js"]);
    assert_eq!(raw.stage.root.as_deref(), Some(Path::new("/srv/site")));
    assert!(!raw.watch.enabled);

    let cfg = watchglob::config::ConfigFile::try_from(raw)?;
    let stage = cfg.glob().pattern(&cfg.stage.patterns);
    assert_eq!(stage.patterns(), ["test/files/*.js", "test/files/*.css"]);
    assert_eq!(stage.scope().exclusions(), ["test/files/skip.js"]);
    Ok(())
}

#[test]
fn root_resolution() {
    let cfg = Path::new("/etc/site/watchglob.toml");
    assert_eq!(resolve_root(Some(cfg), None), Path::new("/etc/site"));
    assert_eq!(resolve_root(Some(cfg), Some(Path::new("www"))), Path::new("/etc/site/www"));
    assert_eq!(resolve_root(Some(cfg), Some(Path::new("/abs"))), Path::new("/abs"));
}

#[test]
fn log_level_priority() {
    assert_eq!(effective_level(Some(LogLevel::Debug), Some("error")), tracing::Level::DEBUG);
    assert_eq!(effective_level(None, Some(" Warning ")), tracing::Level::WARN);
    assert_eq!(effective_level(None, Some("loud")), tracing::Level::INFO);
    assert_eq!(effective_level(None, None), tracing::Level::INFO);
}

#[test]
fn emission_listing_format() {
    let emission = Emission {
        generation: 3,
        trigger: Trigger::Initial,
        resources: vec![
            Arc::new(Resource::new().with_data("inline")),
            Arc::new(
                Resource::new()
                    .with_path("/p/a.js")
                    .with_type("javascript")
                    .with_data("var x = 42;\n"),
            ),
        ],
    };

    let listing = format_emission(&emission);
    let lines: Vec<_> = listing.lines().collect();
    assert_eq!(lines[0], "[watchglob] #3 (initial): 2 resources");
    assert!(lines[1].starts_with("  <memory> - "));

    let fingerprint = emission.resources[1].fingerprint();
    assert_eq!(lines[2], format!("  /p/a.js javascript {}", &fingerprint[..12]));
}
