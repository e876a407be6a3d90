use kiln::error::Error;
use kiln::named_folders::NamedFolders;
use std::path::{Path, PathBuf};

fn home() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap())
}

#[test]
fn test_add_and_get() {
    let mut folders = NamedFolders::new();
    folders.add("app", "/dev/app");

    assert_eq!(folders.get("app").unwrap(), Path::new("/dev/app"));
    assert_eq!(folders.len(), 1);
}

#[test]
fn test_tilde_is_expanded_on_add() {
    let mut folders = NamedFolders::new();
    folders.add("app", "~/dev/cool-project");

    assert_eq!(folders.get("app").unwrap(), home().join("dev/cool-project"));
}

#[test]
fn test_unknown_key_fails() {
    let folders = NamedFolders::new();

    match folders.get("missing") {
        Err(Error::FolderNotFound { key }) => assert_eq!(key, "missing"),
        other => panic!("Expected FolderNotFound, got {other:?}"),
    }
    let err = folders.join("missing", ["a.txt"]).unwrap_err();
    assert_eq!(err.to_string(), "Folder not found, this folder key not found: missing");
}

#[test]
fn test_add_overwrites() {
    let mut folders = NamedFolders::new();
    folders.add("app", "/one").add("app", "/two");

    assert_eq!(folders.get("app").unwrap(), Path::new("/two"));
    assert_eq!(folders.len(), 1);
}

#[test]
fn test_alias_copies_the_folder() {
    let mut folders = NamedFolders::new();
    folders.add("csharp", "/dev/csharp");
    folders.alias("package_json", "csharp").unwrap();

    // Redefining the original does not move the alias
    folders.add("csharp", "/dev/other");

    assert_eq!(folders.get("package_json").unwrap(), Path::new("/dev/csharp"));
    assert!(folders.alias("x", "nope").is_err());
}

#[test]
fn test_join() {
    let mut folders = NamedFolders::new();
    folders.add("csharp", "/dev/csharp");
    let config = folders.join("csharp", ["config"]).unwrap();
    folders.add("webpack", config);

    assert_eq!(folders.get("webpack").unwrap(), Path::new("/dev/csharp/config"));
    assert_eq!(
        folders.join("csharp", ["Models", "Order.cs"]).unwrap(),
        PathBuf::from("/dev/csharp/Models/Order.cs")
    );
    assert_eq!(
        folders.join("csharp", ["Models/Order.cs"]).unwrap(),
        PathBuf::from("/dev/csharp/Models/Order.cs")
    );
}

#[test]
fn test_keys_keep_registration_order() {
    let mut folders = NamedFolders::new();
    folders.add("b", "/b").add("a", "/a").add("c", "/c");

    assert_eq!(folders.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
}

#[test]
fn test_clone_is_independent() {
    let mut original = NamedFolders::new();
    original.add("app", "/dev/app");

    let mut clone = original.clone();
    clone.add("docs", "/dev/docs");
    clone.add("app", "/elsewhere");

    assert_eq!(original.len(), 1);
    assert!(!original.contains("docs"));
    assert_eq!(original.get("app").unwrap(), Path::new("/dev/app"));
    assert_eq!(clone.len(), 2);
}
