// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** validate
/// patterns. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let config: RawConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    ConfigFile::try_from(raw_config)
}

/// Figure out the root directory relative patterns are resolved against.
///
/// - An explicit `[stage].root` wins; a relative one is taken relative to
///   the config file's directory.
/// - Otherwise the config file's directory is used.
/// - With no config file (or a bare filename), the current working
///   directory is used.
pub fn resolve_root(config_path: Option<&Path>, explicit: Option<&Path>) -> PathBuf {
    let config_dir = config_path
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf);
    let base = config_dir
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    match explicit {
        Some(root) if root.is_absolute() => root.to_path_buf(),
        Some(root) => base.join(root),
        None => base,
    }
}
