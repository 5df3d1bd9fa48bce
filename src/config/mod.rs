// src/config/mod.rs

//! Configuration for the `watchglob` binary: TOML model, loading and
//! validation.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, resolve_root};
pub use model::{ConfigFile, RawConfigFile, StageSection, WatchSection};
