// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod resolve;
pub mod resource;
pub mod scope;
pub mod types;
pub mod watch;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, error, info, warn};

use crate::cli::CliArgs;
use crate::config::loader::{load_from_path, resolve_root};
use crate::config::model::{ConfigFile, RawConfigFile};
use crate::engine::{Emission, GlobStage, StageContext};

pub use crate::engine::{StageHandle, StageOptions};
pub use crate::errors::WatchglobError;
pub use crate::resource::Resource;
pub use crate::scope::{Glob, IntoPatterns, glob};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading, with CLI flags layered on top
/// - the glob stage and its file watch
/// - emission printing on stdout
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config.as_ref().map(PathBuf::from);
    let mut raw = match &config_path {
        Some(path) => load_from_path(path)?,
        None => RawConfigFile::default(),
    };
    apply_cli_overrides(&mut raw, &args);
    let cfg = ConfigFile::try_from(raw)?;

    if cfg.stage.patterns.is_empty() {
        return Err(WatchglobError::Config(
            "no patterns given (pass PATTERN arguments or set [stage].patterns)".to_string(),
        )
        .into());
    }

    let root = resolve_root(config_path.as_deref(), cfg.stage.root.as_deref());
    let ctx = StageContext::real(root).with_options(cfg.stage_options());
    let stage = cfg.glob().pattern(&cfg.stage.patterns);

    if args.dry_run {
        print_dry_run(&stage, ctx.root());
        return Ok(());
    }

    let mut handle = stage.start(&ctx, Vec::new()).await?;
    info!(root = ?ctx.root(), watching = handle.is_watching(), "stage started");

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut failure = None;
    loop {
        tokio::select! {
            res = &mut ctrl_c => {
                if let Err(e) = res {
                    warn!(error = %e, "failed to listen for Ctrl+C");
                }
                info!("shutdown requested");
                break;
            }
            next = handle.next() => match next {
                Some(Ok(emission)) => print_emission(&emission)?,
                Some(Err(err)) if err.is_systemic() => {
                    failure = Some(err);
                    break;
                }
                Some(Err(err)) => error!(error = %err, "resolution failed; still watching"),
                None => break,
            },
        }
    }

    handle.stop().await?;
    match failure {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

/// Layer command-line flags on top of a (possibly empty) config file.
pub fn apply_cli_overrides(raw: &mut RawConfigFile, args: &CliArgs) {
    raw.stage.patterns.extend(args.patterns.iter().cloned());
    raw.stage.within.extend(args.within.iter().cloned());
    raw.stage.exclude.extend(args.exclude.iter().cloned());
    if let Some(root) = &args.root {
        raw.stage.root = Some(PathBuf::from(root));
    }
    if args.once {
        raw.watch.enabled = false;
    }
}

/// One emission in the listing format:
///
/// ```text
/// [watchglob] #<gen> (<trigger>): <n> resources
///   <path> <type> <fingerprint>
/// ```
pub fn format_emission(emission: &Emission) -> String {
    let mut out = format!(
        "[watchglob] #{} ({}): {} resources\n",
        emission.generation,
        emission.trigger,
        emission.len()
    );
    for resource in &emission.resources {
        let path = resource
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<memory>".to_string());
        let ty = resource.resource_type().unwrap_or("-");
        let fingerprint = resource.fingerprint();
        let short = fingerprint.get(..12).unwrap_or(&fingerprint);
        out.push_str(&format!("  {path} {ty} {short}\n"));
    }
    out
}

fn print_emission(emission: &Emission) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(format_emission(emission).as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Simple dry-run output: the effective absolute patterns and exclusions.
fn print_dry_run(stage: &GlobStage, root: &Path) {
    println!("watchglob dry-run");
    println!("  root = {}", root.display());
    if !stage.scope().prefix_chain().is_empty() {
        println!("  within = {:?}", stage.scope().prefix_chain());
    }
    println!();

    println!("patterns ({}):", stage.patterns().len());
    for pattern in stage.absolute_patterns(root) {
        println!("  - {pattern}");
    }

    let exclusions = stage.absolute_exclusions(root);
    if !exclusions.is_empty() {
        println!("exclude ({}):", exclusions.len());
        for pattern in exclusions {
            println!("  - {pattern}");
        }
    }

    debug!("dry-run complete (nothing resolved)");
}
