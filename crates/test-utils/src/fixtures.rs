use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const FILE_1_JS: &str = "var x = 42;\n";
pub const FILE_2_JS: &str = "function nothing() {\n}\n";
pub const CONCATENATED_JS: &str = "var x = 42;\nfunction nothing() {\n}\n";

/// Temp project with `test/files/{file-1.js, file-2.js, concatenated.js}`.
pub fn js_fixture() -> TempDir {
    let dir = tempfile::tempdir().expect("create tempdir");
    write_file(dir.path(), "test/files/file-1.js", FILE_1_JS);
    write_file(dir.path(), "test/files/file-2.js", FILE_2_JS);
    write_file(dir.path(), "test/files/concatenated.js", CONCATENATED_JS);
    dir
}

/// Write `contents` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(&path, contents).expect("write fixture file");
    path
}
