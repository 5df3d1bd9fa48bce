mod common;
use crate::common::{init_tracing, TestResult};

use std::path::Path;
use std::sync::Arc;

use watchglob::fs::mock::MockFileSystem;
use watchglob::resource::{type_for_extension, FsResourceLoader, Resource, ResourceLoader};

#[test]
fn type_follows_extension() {
    assert_eq!(type_for_extension("js"), Some("javascript"));
    assert_eq!(type_for_extension("coffee"), Some("coffeescript"));
    assert_eq!(type_for_extension("scss"), Some("scss"));
    assert_eq!(type_for_extension("sass"), Some("scss"));
    assert_eq!(type_for_extension("styl"), Some("stylus"));
    assert_eq!(type_for_extension("htm"), Some("html"));
    assert_eq!(type_for_extension("map"), Some("sourcemap"));
    assert_eq!(type_for_extension("rs"), None);
}

#[test]
fn loads_data_filename_and_type() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("/proj/file-1.js", "var x = 42;\n");
    let loader = FsResourceLoader::new(Arc::new(fs));

    let resource = loader.load(Path::new("/proj/file-1.js"))?;
    assert_eq!(resource.path(), Some(Path::new("/proj/file-1.js")));
    assert_eq!(resource.filename(), Some("file-1.js"));
    assert_eq!(resource.data(), "var x = 42;\n");
    assert_eq!(resource.resource_type(), Some("javascript"));
    assert_eq!(resource.source_map(), None);
    Ok(())
}

#[test]
fn unknown_extension_has_no_type() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/notes.txt", "hi");
    let loader = FsResourceLoader::new(Arc::new(fs));

    assert_eq!(loader.load(Path::new("/proj/notes.txt"))?.resource_type(), None);
    Ok(())
}

#[test]
fn sibling_source_map_is_attached() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/app.js", "var a;\n//# sourceMappingURL=app.js.map\n");
    fs.add_file("/proj/app.js.map", "{\"version\":3}");
    fs.add_file("/proj/style.css", "a{}\n/*# sourceMappingURL=style.css.map */\n");
    fs.add_file("/proj/style.css.map", "{\"version\":3,\"file\":\"style.css\"}");
    let loader = FsResourceLoader::new(Arc::new(fs));

    let js = loader.load(Path::new("/proj/app.js"))?;
    assert_eq!(js.source_map(), Some("{\"version\":3}"));

    let css = loader.load(Path::new("/proj/style.css"))?;
    assert_eq!(css.source_map(), Some("{\"version\":3,\"file\":\"style.css\"}"));
    Ok(())
}

#[test]
fn inline_or_missing_source_maps_are_ignored() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file(
        "/proj/inline.js",
        "var a;\n//# sourceMappingURL=data:application/json;base64,e30=\n",
    );
    fs.add_file("/proj/orphan.js", "var b;\n//# sourceMappingURL=orphan.js.map\n");
    let loader = FsResourceLoader::new(Arc::new(fs));

    assert_eq!(loader.load(Path::new("/proj/inline.js"))?.source_map(), None);
    assert_eq!(loader.load(Path::new("/proj/orphan.js"))?.source_map(), None);
    Ok(())
}

#[test]
fn missing_file_is_an_error() {
    let loader = FsResourceLoader::new(Arc::new(MockFileSystem::new()));
    assert!(loader.load(Path::new("/proj/gone.js")).is_err());
}

#[test]
fn fingerprint_tracks_content() {
    let a = Resource::new().with_data("same");
    let b = Resource::new().with_path("/elsewhere").with_data("same");
    let c = Resource::new().with_data("different");

    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_ne!(a.fingerprint(), c.fingerprint());
    assert_eq!(a.fingerprint().len(), 64);
}
