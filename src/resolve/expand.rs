// src/resolve/expand.rs

//! Expanding one absolute pattern into the files it matches.

use std::fmt::Debug;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use globset::GlobMatcher;
use tracing::{debug, warn};

use crate::fs::{FileSystem, RealFileSystem};
use crate::resolve::pattern::{compile_matcher, PatternParts};

/// The matching primitive: `pattern -> matched file paths`.
///
/// Implementations are called on blocking worker threads and must return
/// paths in a stable order for a given filesystem state.
pub trait Expander: Send + Sync + Debug {
    fn expand(&self, pattern: &str) -> Result<Vec<PathBuf>>;
}

/// Expander that walks a [`FileSystem`] from the pattern's literal base
/// directory and keeps files matching the compiled glob.
#[derive(Debug, Clone)]
pub struct FsExpander {
    fs: Arc<dyn FileSystem>,
}

impl FsExpander {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    fn walk(
        &self,
        dir: &Path,
        depth_left: Option<usize>,
        matcher: &GlobMatcher,
        out: &mut Vec<PathBuf>,
    ) -> Result<()> {
        if depth_left == Some(0) {
            return Ok(());
        }

        // A directory removed or made unreadable mid-walk contributes no
        // entries.
        let mut entries = match self.fs.read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => match skippable_kind(&err) {
                Some(io::ErrorKind::NotFound) => {
                    debug!(?dir, "directory vanished during walk; skipped");
                    return Ok(());
                }
                Some(_) => {
                    warn!(?dir, error = %err, "directory unreadable; skipped");
                    return Ok(());
                }
                None => return Err(err),
            },
        };
        entries.sort();

        for path in entries {
            if self.fs.is_dir(&path) {
                if self.fs.is_symlink(&path) {
                    debug!(?path, "symlinked directory not followed");
                    continue;
                }
                self.walk(&path, depth_left.map(|d| d - 1), matcher, out)?;
            } else if self.fs.is_file(&path) && matcher.is_match(&path) {
                out.push(path);
            }
        }
        Ok(())
    }
}

/// IO error kinds of a failed listing that leave the walk intact.
fn skippable_kind(err: &anyhow::Error) -> Option<io::ErrorKind> {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .map(io::Error::kind)
        .find(|kind| matches!(kind, io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied))
}

impl Default for FsExpander {
    fn default() -> Self {
        Self::new(Arc::new(RealFileSystem))
    }
}

impl Expander for FsExpander {
    fn expand(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let parts = PatternParts::split(pattern);

        if parts.literal {
            return Ok(if self.fs.is_file(&parts.base) {
                vec![parts.base]
            } else {
                Vec::new()
            });
        }

        let matcher = compile_matcher(pattern)?;

        if !self.fs.is_dir(&parts.base) {
            debug!(%pattern, base = ?parts.base, "pattern base directory missing; no matches");
            return Ok(Vec::new());
        }

        let mut out = Vec::new();
        self.walk(&parts.base, parts.depth, &matcher, &mut out)?;
        debug!(%pattern, matches = out.len(), "expanded pattern");
        Ok(out)
    }
}
