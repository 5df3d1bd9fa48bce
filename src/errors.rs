// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchglobError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid glob pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("failed to expand pattern `{pattern}`: {source:#}")]
    Expand {
        pattern: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to load resource {path:?}: {source:#}")]
    Load {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("resolution task failed: {0}")]
    Task(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WatchglobError {
    /// Whether this failure affects every future resolution pass, as opposed
    /// to a single file that may be fixed by the next change.
    ///
    /// The watching stage stops on systemic failures and keeps listening
    /// otherwise.
    pub fn is_systemic(&self) -> bool {
        match self {
            WatchglobError::InvalidPattern { .. }
            | WatchglobError::Expand { .. }
            | WatchglobError::Task(_)
            | WatchglobError::Config(_) => true,
            WatchglobError::Load { .. }
            | WatchglobError::Io(_)
            | WatchglobError::Toml(_)
            | WatchglobError::Other(_) => false,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, WatchglobError>;
