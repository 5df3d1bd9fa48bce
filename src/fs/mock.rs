// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir(Vec<String>), // child names
    Link(PathBuf),    // absolute target
}

/// Links followed before a lookup gives up, like `ELOOP`.
const MAX_LINK_HOPS: usize = 8;

/// In-memory filesystem tree.
///
/// Parent directories are created implicitly by [`MockFileSystem::add_file`].
/// Clones share the same tree, so a test can keep one handle and mutate the
/// tree while the resolver holds another.
#[derive(Debug, Clone)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut files = HashMap::new();
        files.insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            files: Arc::new(Mutex::new(files)),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<PathBuf, MockEntry>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        self.insert(path.as_ref(), MockEntry::File(content.into()));
    }

    /// Add a symbolic link at `path` pointing at the absolute `target`.
    pub fn add_symlink(&self, path: impl AsRef<Path>, target: impl Into<PathBuf>) {
        self.insert(path.as_ref(), MockEntry::Link(target.into()));
    }

    fn insert(&self, path: &Path, entry: MockEntry) {
        let mut files = self.entries();
        files.insert(path.to_path_buf(), entry);

        if let Some(parent) = path.parent() {
            let parent = non_empty(parent);
            ensure_dir_entry(&mut files, parent);
            link_child(&mut files, parent, path);
        }
    }

    /// The entry at `path`, with symbolic links followed.
    fn resolved(&self, path: &Path) -> Option<MockEntry> {
        let files = self.entries();
        let mut current = path.to_path_buf();
        for _ in 0..MAX_LINK_HOPS {
            match files.get(&current)? {
                MockEntry::Link(target) => current = target.clone(),
                entry => return Some(entry.clone()),
            }
        }
        None
    }

    /// Remove a file (not a directory) from the tree.
    pub fn remove_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut files = self.entries();
        if !matches!(files.get(path), Some(MockEntry::File(_))) {
            return;
        }
        files.remove(path);

        let name = path.file_name().and_then(|n| n.to_str());
        if let (Some(parent), Some(name)) = (path.parent(), name) {
            if let Some(MockEntry::Dir(children)) = files.get_mut(non_empty(parent)) {
                children.retain(|c| c != name);
            }
        }
    }
}

fn non_empty(parent: &Path) -> &Path {
    if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    }
}

fn ensure_dir_entry(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    if files.contains_key(path) {
        return;
    }
    files.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
    if let Some(parent) = path.parent() {
        let parent = non_empty(parent);
        if parent != path {
            ensure_dir_entry(files, parent);
            link_child(files, parent, path);
        }
    }
}

fn link_child(files: &mut HashMap<PathBuf, MockEntry>, parent: &Path, child: &Path) {
    if let Some(MockEntry::Dir(children)) = files.get_mut(parent) {
        if let Some(name) = child.file_name().and_then(|n| n.to_str()) {
            if !children.iter().any(|c| c == name) {
                children.push(name.to_string());
            }
        }
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(path: &Path) -> anyhow::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{}: not found", path.display())).into()
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        match self.resolved(path) {
            Some(MockEntry::File(bytes)) => String::from_utf8(bytes)
                .map_err(|e| anyhow!("{} is not UTF-8: {e}", path.display())),
            Some(_) => Err(anyhow!("{} is a directory", path.display())),
            None => Err(not_found(path)),
        }
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.resolved(path), Some(MockEntry::File(_)))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.resolved(path), Some(MockEntry::Dir(_)))
    }

    fn is_symlink(&self, path: &Path) -> bool {
        matches!(self.entries().get(path), Some(MockEntry::Link(_)))
    }

    fn read_dir(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        match self.resolved(dir) {
            Some(MockEntry::Dir(children)) => Ok(children.iter().map(|c| dir.join(c)).collect()),
            Some(_) => Err(anyhow!("{} is not a directory", dir.display())),
            None => Err(not_found(dir)),
        }
    }
}
