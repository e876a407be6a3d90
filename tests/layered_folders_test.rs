use kiln::error::Error;
use kiln::layered_folders::LayeredFolders;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// app, domain and global template folders:
///
/// - template1.txt: app, global
/// - template2.txt: domain, global
/// - template3.txt: global
/// - abc/xyz/deep-template.txt: global
fn sample_folders() -> (TempDir, LayeredFolders) {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let files = [
        ("app-template", "template1.txt"),
        ("global-template", "template1.txt"),
        ("domain-template", "template2.txt"),
        ("global-template", "template2.txt"),
        ("global-template", "template3.txt"),
        ("global-template", "abc/xyz/deep-template.txt"),
    ];
    for (folder, file) in files {
        let path = root.join(folder).join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, format!("{folder}: {file}")).unwrap();
    }

    let mut folders = LayeredFolders::new();
    folders
        .add("global", root.join("global-template"))
        .add("domain", root.join("domain-template"))
        .add("app", root.join("app-template"));

    (temp_dir, folders)
}

#[test]
fn test_new_is_empty() {
    let folders = LayeredFolders::new();
    assert!(folders.is_empty());
    assert!(folders.ordered_keys().is_empty());
}

#[test]
fn test_ordered_keys_reverse_add_order() {
    let mut folders = LayeredFolders::new();
    folders.add("k1", "/f1").add("k2", "/f2").add("k3", "/f3");

    assert_eq!(folders.ordered_keys(), vec!["k3", "k2", "k1"]);
    assert_eq!(
        folders.ordered_folders(),
        vec![Path::new("/f3"), Path::new("/f2"), Path::new("/f1")]
    );
}

#[test]
fn test_readding_a_key_moves_it_to_the_top() {
    let mut folders = LayeredFolders::new();
    folders.add("a", "/a").add("b", "/b").add("a", "/a2");

    assert_eq!(folders.ordered_keys(), vec!["a", "b"]);
    assert_eq!(folders.get("a").unwrap(), Path::new("/a2"));
    assert_eq!(folders.len(), 2);
}

#[test]
fn test_get_unknown_key() {
    let folders = LayeredFolders::new();
    assert!(matches!(folders.get("app"), Err(Error::FolderNotFound { .. })));
}

#[test]
fn test_find_file_folder() {
    let (_temp_dir, folders) = sample_folders();

    assert!(folders.find_file_folder("bad.txt").is_none());
    assert!(folders.find_file_folder("template1.txt").unwrap().ends_with("app-template"));
    assert!(folders.find_file_folder("template2.txt").unwrap().ends_with("domain-template"));
    assert!(folders.find_file_folder("template3.txt").unwrap().ends_with("global-template"));
    assert!(folders
        .find_file_folder(Path::new("abc").join("xyz").join("deep-template.txt"))
        .unwrap()
        .ends_with("global-template"));
}

#[test]
fn test_find_file() {
    let (_temp_dir, folders) = sample_folders();

    assert!(folders.find_file("bad.txt").is_none());
    assert!(folders.find_file("template1.txt").unwrap().ends_with("app-template/template1.txt"));
    assert!(folders.find_file("template3.txt").unwrap().ends_with("global-template/template3.txt"));
    assert!(folders
        .find_file("abc/xyz/deep-template.txt")
        .unwrap()
        .ends_with("global-template/abc/xyz/deep-template.txt"));
}

#[test]
fn test_tilde_is_expanded() {
    let mut folders = LayeredFolders::new();
    folders.add("global", "~/templates");

    let home = PathBuf::from(std::env::var("HOME").unwrap());
    assert_eq!(folders.get("global").unwrap(), home.join("templates"));
}

#[test]
fn test_clone_is_independent() {
    let mut original = LayeredFolders::new();
    original.add("global", "/global");

    let mut clone = original.clone();
    clone.add("app", "/app");

    assert_eq!(original.ordered_keys(), vec!["global"]);
    assert_eq!(clone.ordered_keys(), vec!["app", "global"]);
}
