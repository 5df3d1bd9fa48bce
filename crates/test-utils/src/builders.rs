#![allow(dead_code)]

use std::path::PathBuf;

use watchglob::config::{ConfigFile, RawConfigFile};
use watchglob::errors::Result;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.config.stage.patterns.push(pattern.to_string());
        self
    }

    pub fn with_within(mut self, dir: &str) -> Self {
        self.config.stage.within.push(dir.to_string());
        self
    }

    pub fn with_exclude(mut self, pattern: &str) -> Self {
        self.config.stage.exclude.push(pattern.to_string());
        self
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.stage.root = Some(root.into());
        self
    }

    pub fn with_watch(mut self, enabled: bool) -> Self {
        self.config.watch.enabled = enabled;
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.config.watch.channel_capacity = capacity;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn try_build(self) -> Result<ConfigFile> {
        ConfigFile::try_from(self.config)
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
