// src/resource/loader.rs

//! Turning matched paths into [`Resource`]s.

use std::fmt::Debug;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use anyhow::Result;
use regex::Regex;
use tracing::{debug, warn};

use crate::fs::{FileSystem, RealFileSystem};

use super::{type_for_extension, Resource};

/// Loads a resource for a matched path.
///
/// Called from blocking worker threads, one call per matched file.
pub trait ResourceLoader: Send + Sync + Debug {
    fn load(&self, path: &Path) -> Result<Resource>;
}

/// Matches a trailing `//# sourceMappingURL=...` or
/// `/*# sourceMappingURL=... */` comment.
/// `None` only if the pattern fails to compile; source maps are then never
/// attached.
static SOURCE_MAPPING_URL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?://|/\*)\s*[#@]\s*sourceMappingURL=(\S+?)\s*(?:\*/)?\s*$")
        .map_err(|err| warn!(error = %err, "sourceMappingURL pattern rejected"))
        .ok()
});

/// Loader that reads UTF-8 files through a [`FileSystem`].
#[derive(Debug, Clone)]
pub struct FsResourceLoader {
    fs: Arc<dyn FileSystem>,
}

impl FsResourceLoader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    fn load_source_map(&self, path: &Path, data: &str) -> Option<String> {
        let url = SOURCE_MAPPING_URL
            .as_ref()?
            .captures_iter(data)
            .last()
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())?;

        if url.starts_with("data:") {
            debug!(?path, "inline source map ignored");
            return None;
        }

        let map_path = path.parent()?.join(url);
        if !self.fs.is_file(&map_path) {
            debug!(?path, map = ?map_path, "referenced source map not found");
            return None;
        }

        match self.fs.read_to_string(&map_path) {
            Ok(map) => Some(map),
            Err(err) => {
                debug!(?path, map = ?map_path, error = %err, "failed to read source map");
                None
            }
        }
    }
}

impl Default for FsResourceLoader {
    fn default() -> Self {
        Self::new(Arc::new(RealFileSystem))
    }
}

impl ResourceLoader for FsResourceLoader {
    fn load(&self, path: &Path) -> Result<Resource> {
        let data = self.fs.read_to_string(path)?;
        let mut resource = Resource::new().with_path(path);

        if let Some(ty) = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(type_for_extension)
        {
            resource = resource.with_type(ty);
        }

        if let Some(map) = self.load_source_map(path, &data) {
            resource = resource.with_source_map(map);
        }

        Ok(resource.with_data(data))
    }
}
