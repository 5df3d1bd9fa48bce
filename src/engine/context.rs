// src/engine/context.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::engine::StageOptions;
use crate::fs::{FileSystem, RealFileSystem};
use crate::resolve::{Expander, FsExpander};
use crate::resource::{FsResourceLoader, ResourceLoader};
use crate::watch::{NotifyWatchBackend, WatchBackend};

/// Collaborators and options a stage runs with.
///
/// Relative patterns are resolved against `root`.
#[derive(Debug, Clone)]
pub struct StageContext {
    root: PathBuf,
    expander: Arc<dyn Expander>,
    loader: Arc<dyn ResourceLoader>,
    watch: Arc<dyn WatchBackend>,
    options: StageOptions,
}

impl StageContext {
    pub fn new(
        root: impl Into<PathBuf>,
        expander: Arc<dyn Expander>,
        loader: Arc<dyn ResourceLoader>,
        watch: Arc<dyn WatchBackend>,
    ) -> Self {
        let root = root.into();
        let root = std::path::absolute(&root).unwrap_or(root);
        Self {
            root,
            expander,
            loader,
            watch,
            options: StageOptions::default(),
        }
    }

    /// Expansion and loading through `fs`, watching through `watch`.
    pub fn with_filesystem(
        root: impl Into<PathBuf>,
        fs: Arc<dyn FileSystem>,
        watch: Arc<dyn WatchBackend>,
    ) -> Self {
        Self::new(
            root,
            Arc::new(FsExpander::new(Arc::clone(&fs))),
            Arc::new(FsResourceLoader::new(fs)),
            watch,
        )
    }

    /// Real filesystem + `notify`.
    pub fn real(root: impl Into<PathBuf>) -> Self {
        Self::with_filesystem(root, Arc::new(RealFileSystem), Arc::new(NotifyWatchBackend))
    }

    pub fn with_options(mut self, options: StageOptions) -> Self {
        self.options = options;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn expander(&self) -> &Arc<dyn Expander> {
        &self.expander
    }

    pub fn loader(&self) -> &Arc<dyn ResourceLoader> {
        &self.loader
    }

    pub fn watch_backend(&self) -> &Arc<dyn WatchBackend> {
        &self.watch
    }

    pub fn options(&self) -> StageOptions {
        self.options
    }
}
