// src/config/validate.rs

use tracing::warn;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, WatchglobError};
use crate::resolve::pattern::compile_matcher;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = WatchglobError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.stage, raw.watch))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_watch_section(cfg)?;
    validate_within(cfg)?;
    validate_patterns(cfg)?;
    Ok(())
}

fn validate_watch_section(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.channel_capacity == 0 {
        return Err(WatchglobError::Config(
            "[watch].channel_capacity must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_within(cfg: &RawConfigFile) -> Result<()> {
    if cfg.stage.within.iter().any(|d| d.trim().is_empty()) {
        return Err(WatchglobError::Config(
            "[stage].within entries must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_patterns(cfg: &RawConfigFile) -> Result<()> {
    if cfg.stage.patterns.is_empty() {
        // Legal: the stage then only passes upstream resources through.
        warn!("[stage].patterns is empty; nothing will be resolved");
    }

    for pattern in cfg.stage.patterns.iter().chain(cfg.stage.exclude.iter()) {
        compile_matcher(pattern)?;
    }
    Ok(())
}
