// src/fs/mod.rs

//! Filesystem access used by pattern expansion and resource loading.
//!
//! Production code goes through [`RealFileSystem`]; tests expand and load
//! against the in-memory [`mock::MockFileSystem`].

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod mock;

/// The read-only view of a filesystem that resolution needs.
pub trait FileSystem: Send + Sync + Debug {
    /// Whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    fn is_file(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// True if `path` itself is a symbolic link (not following it).
    fn is_symlink(&self, path: &Path) -> bool;

    /// Full paths of the entries of `dir`, in no particular order.
    fn read_dir(&self, dir: &Path) -> Result<Vec<PathBuf>>;
}

/// [`FileSystem`] over `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        path.symlink_metadata()
            .is_ok_and(|meta| meta.file_type().is_symlink())
    }

    fn read_dir(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::read_dir(dir)
            .with_context(|| format!("listing {}", dir.display()))?
            .map(|entry| {
                entry
                    .map(|e| e.path())
                    .with_context(|| format!("reading an entry of {}", dir.display()))
            })
            .collect()
    }
}
