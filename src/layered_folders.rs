//! Layered template folders.
//!
//! Folders are searched most-recently-added first, so register the most
//! global folder first and the most specific one last:
//!
//! ```text
//! folders.add("global", "~/global_templates");
//! folders.add("domain", "/my-project/domain_templates");
//! folders.add("app",    "/my-project/my-app/.templates");
//! ```
//!
//! A lookup then tries `app`, `domain` and finally `global`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::named_folders::expand_home;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayeredFolders {
    /// Search order, highest priority first.
    ordered: Vec<(String, PathBuf)>,
    by_key: HashMap<String, PathBuf>,
}

impl LayeredFolders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `folder` on top of the stack so it is searched before every
    /// previously added folder. Re-adding a key moves it to the top.
    pub fn add<K: Into<String>, P: AsRef<Path>>(&mut self, key: K, folder: P) -> &mut Self {
        let key = key.into();
        let folder = expand_home(folder);

        self.ordered.retain(|(existing, _)| *existing != key);
        self.ordered.insert(0, (key.clone(), folder.clone()));
        self.by_key.insert(key, folder);
        self
    }

    /// Returns the folder registered under `key`.
    pub fn get(&self, key: &str) -> Result<&Path> {
        self.by_key
            .get(key)
            .map(PathBuf::as_path)
            .ok_or_else(|| Error::FolderNotFound { key: key.to_string() })
    }

    /// Returns the first folder, in priority order, that contains `relative`.
    pub fn find_file_folder<P: AsRef<Path>>(&self, relative: P) -> Option<&Path> {
        let relative = relative.as_ref();
        let found = self
            .ordered
            .iter()
            .find(|(_, folder)| folder.join(relative).exists())
            .map(|(_, folder)| folder.as_path());

        match found {
            Some(folder) => debug!("Found '{}' in {}", relative.display(), folder.display()),
            None => debug!("'{}' not found in any template folder", relative.display()),
        }
        found
    }

    /// Like [`find_file_folder`](Self::find_file_folder) but returns the full file path.
    pub fn find_file<P: AsRef<Path>>(&self, relative: P) -> Option<PathBuf> {
        let relative = relative.as_ref();
        self.find_file_folder(relative).map(|folder| folder.join(relative))
    }

    /// Keys in search order.
    pub fn ordered_keys(&self) -> Vec<&str> {
        self.ordered.iter().map(|(key, _)| key.as_str()).collect()
    }

    /// Folders in search order.
    pub fn ordered_folders(&self) -> Vec<&Path> {
        self.ordered.iter().map(|(_, folder)| folder.as_path()).collect()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}
