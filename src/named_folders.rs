//! Named output folders.
//!
//! A folder is registered under a short key (`app`, `docs`, `webpack`) so that
//! files can be addressed by key rather than by absolute path. Keys may be
//! copied from other keys, or derived from them with [`NamedFolders::join`].
//!
//! ```
//! use kiln::named_folders::NamedFolders;
//!
//! let mut folders = NamedFolders::new();
//! folders.add("app", "/dev/cool-project");
//! folders.alias("package_json", "app").unwrap();
//!
//! let config = folders.join("app", ["config"]).unwrap();
//! folders.add("webpack", config);
//!
//! assert_eq!(
//!     folders.join("webpack", ["webpack.config.js"]).unwrap(),
//!     std::path::PathBuf::from("/dev/cool-project/config/webpack.config.js")
//! );
//! ```

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::debug;

use crate::error::{Error, Result};

/// Expands a leading `~` into the user's home directory.
///
/// Paths that don't start with `~` are returned unchanged.
pub fn expand_home<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    match path.to_str() {
        Some(s) if s.starts_with('~') => PathBuf::from(shellexpand::tilde(s).as_ref()),
        _ => path.to_path_buf(),
    }
}

/// Mapping from folder key to folder path, kept in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedFolders {
    folders: IndexMap<String, PathBuf>,
}

impl NamedFolders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `folder` under `key`, replacing any previous entry.
    ///
    /// A leading `~` is expanded at insertion time.
    pub fn add<K: Into<String>, P: AsRef<Path>>(&mut self, key: K, folder: P) -> &mut Self {
        let key = key.into();
        let folder = expand_home(folder);
        debug!("Named folder '{}' -> {}", key, folder.display());
        self.folders.insert(key, folder);
        self
    }

    /// Registers `key` with a copy of the folder currently stored under `existing_key`.
    ///
    /// Later changes to `existing_key` are not reflected in `key`.
    pub fn alias<K: Into<String>>(&mut self, key: K, existing_key: &str) -> Result<&mut Self> {
        let folder = self.get(existing_key)?.to_path_buf();
        Ok(self.add(key, folder))
    }

    /// Returns the folder registered under `key`.
    ///
    /// # Errors
    /// * `Error::FolderNotFound` if the key was never registered
    pub fn get(&self, key: &str) -> Result<&Path> {
        self.folders
            .get(key)
            .map(PathBuf::as_path)
            .ok_or_else(|| Error::FolderNotFound { key: key.to_string() })
    }

    /// Joins sub-folders and/or a file name onto the folder registered under `key`.
    pub fn join<I, P>(&self, key: &str, parts: I) -> Result<PathBuf>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut path = self.get(key)?.to_path_buf();
        for part in parts {
            path.push(part);
        }
        Ok(path)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.folders.contains_key(key)
    }

    /// Folder keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.folders.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.folders.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}
