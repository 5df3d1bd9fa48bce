// src/resource/mod.rs

//! Loaded file representation passed down the pipeline.
//!
//! A [`Resource`] is immutable once built. Stages share resources as
//! `Arc<Resource>` so that pass-through resources keep their identity across
//! every emission.

pub mod loader;

use std::fmt;
use std::path::{Path, PathBuf};

pub use loader::{FsResourceLoader, ResourceLoader};

/// A single file (or in-memory document) flowing through the pipeline.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Resource {
    path: Option<PathBuf>,
    data: String,
    resource_type: Option<String>,
    source_map: Option<String>,
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("path", &self.path)
            .field("type", &self.resource_type)
            .field("len", &self.data.len())
            .finish_non_exhaustive()
    }
}

impl Resource {
    /// Empty in-memory resource with no backing path.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = data.into();
        self
    }

    pub fn with_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }

    pub fn with_source_map(mut self, source_map: impl Into<String>) -> Self {
        self.source_map = Some(source_map.into());
        self
    }

    /// Absolute path of the file this resource was loaded from.
    ///
    /// Used as the identity key for deduplication and exclusion.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Final path component, if any.
    pub fn filename(&self) -> Option<&str> {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|n| n.to_str())
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    /// Content type such as `"javascript"` or `"css"`.
    pub fn resource_type(&self) -> Option<&str> {
        self.resource_type.as_deref()
    }

    pub fn source_map(&self) -> Option<&str> {
        self.source_map.as_deref()
    }

    /// Hex `blake3` digest of the resource data.
    pub fn fingerprint(&self) -> String {
        blake3::hash(self.data.as_bytes()).to_hex().to_string()
    }
}

/// Map a file extension onto the pipeline's content type name.
pub fn type_for_extension(ext: &str) -> Option<&'static str> {
    let ty = match ext.to_ascii_lowercase().as_str() {
        "js" => "javascript",
        "coffee" => "coffeescript",
        "ts" => "typescript",
        "css" => "css",
        "less" => "less",
        "scss" | "sass" => "scss",
        "styl" => "stylus",
        "html" | "htm" => "html",
        "json" => "json",
        "map" => "sourcemap",
        _ => return None,
    };
    Some(ty)
}
