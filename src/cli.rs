// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `watchglob`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "watchglob",
    version,
    about = "Resolve glob patterns to file resources and re-emit them on every change.",
    long_about = None
)]
pub struct CliArgs {
    /// Glob patterns to resolve, appended to `[stage].patterns`.
    #[arg(value_name = "PATTERN")]
    pub patterns: Vec<String>,

    /// Path to a config file (TOML).
    ///
    /// Without it, only the patterns and flags given on the command line are
    /// used.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Resolve inside this directory. Repeat to nest (outermost first).
    #[arg(long, value_name = "DIR")]
    pub within: Vec<String>,

    /// Drop resources matching this pattern. Repeatable.
    #[arg(long, value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Directory relative patterns are resolved against.
    #[arg(long, value_name = "DIR")]
    pub root: Option<String>,

    /// Resolve once, no watching.
    #[arg(long)]
    pub once: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WATCHGLOB_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the effective patterns, but don't resolve.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
