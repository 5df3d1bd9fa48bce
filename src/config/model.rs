// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::engine::StageOptions;
use crate::scope::Glob;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [stage]
/// root = "."
/// within = ["test", "files"]
/// patterns = ["*.js"]
/// exclude = ["concatenated.js"]
///
/// [watch]
/// enabled = true
/// channel_capacity = 64
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub stage: StageSection,

    #[serde(default)]
    pub watch: WatchSection,
}

/// `[stage]` section: what to resolve.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StageSection {
    /// Directory relative patterns are resolved against.
    ///
    /// If `None`, the directory containing the config file is used.
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// `within` directories, outermost first.
    #[serde(default)]
    pub within: Vec<String>,

    /// Patterns to resolve inside the scope.
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Exclusion patterns, relative to the full `within` scope.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// `[watch]` section: live-update behaviour.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// `false` resolves once and exits.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Bound for the change-event and output channels.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_enabled() -> bool {
    true
}

fn default_channel_capacity() -> usize {
    64
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Validated configuration. Obtain one through `ConfigFile::try_from`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub stage: StageSection,
    pub watch: WatchSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(stage: StageSection, watch: WatchSection) -> Self {
        Self { stage, watch }
    }

    /// The builder described by `[stage]`: `within` applied in order, then
    /// `exclude` inside the full scope.
    pub fn glob(&self) -> Glob {
        let scoped = self
            .stage
            .within
            .iter()
            .fold(Glob::root(), |glob, dir| glob.within(dir));
        if self.stage.exclude.is_empty() {
            scoped
        } else {
            scoped.exclude(&self.stage.exclude)
        }
    }

    pub fn stage_options(&self) -> StageOptions {
        StageOptions {
            watch: self.watch.enabled,
            channel_capacity: self.watch.channel_capacity,
        }
    }
}
