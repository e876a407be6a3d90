//! Splits a file path into its segments and rebuilds new paths from them.

use std::path::Path;

use lazy_static::lazy_static;
use regex::{NoExpand, Regex};

lazy_static! {
    static ref T_FILE: Regex = Regex::new(r"(?i)\$T_FILE\$").unwrap();
    static ref T_PATH: Regex = Regex::new(r"(?i)\$T_PATH\$").unwrap();
    static ref T_FILE_NAME: Regex = Regex::new(r"(?i)\$T_FILE_NAME\$").unwrap();
    static ref T_EXT: Regex = Regex::new(r"(?i)\$T_EXT\$").unwrap();
    static ref T_FILE_NAME_ONLY: Regex = Regex::new(r"(?i)\$T_FILE_NAME_ONLY\$").unwrap();
}

/// The segments of a file path.
///
/// For `/a/b/c/d.txt`:
///
/// | segment          | value          | token               |
/// |------------------|----------------|---------------------|
/// | `file`           | `/a/b/c/d.txt` | `$T_FILE$`          |
/// | `path`           | `/a/b/c`       | `$T_PATH$`          |
/// | `file_name`      | `d.txt`        | `$T_FILE_NAME$`     |
/// | `ext`            | `.txt`         | `$T_EXT$`           |
/// | `file_name_only` | `d`            | `$T_FILE_NAME_ONLY$`|
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSegments {
    pub file: String,
    pub path: String,
    pub file_name: String,
    pub ext: String,
    pub file_name_only: String,
}

impl FileSegments {
    pub fn new<P: AsRef<Path>>(file: P) -> Self {
        let file = file.as_ref();

        let path = match file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_string_lossy().into_owned(),
            Some(_) => ".".to_string(),
            None => file.to_string_lossy().into_owned(),
        };
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = file
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let file_name_only = file_name
            .strip_suffix(ext.as_str())
            .unwrap_or(&file_name)
            .to_string();

        Self {
            file: file.to_string_lossy().into_owned(),
            path,
            file_name,
            ext,
            file_name_only,
        }
    }

    /// Applies `f` to every segment, e.g. to shell-quote them before they are
    /// substituted into a command line.
    pub fn map<F: Fn(&str) -> String>(&self, f: F) -> Self {
        Self {
            file: f(&self.file),
            path: f(&self.path),
            file_name: f(&self.file_name),
            ext: f(&self.ext),
            file_name_only: f(&self.file_name_only),
        }
    }

    /// Replaces every `$T_*$` token in `target` (case-insensitive) with the
    /// matching segment.
    pub fn interpolate(&self, target: &str) -> String {
        let out = T_FILE.replace_all(target, NoExpand(&self.file));
        let out = T_PATH.replace_all(&out, NoExpand(&self.path));
        let out = T_FILE_NAME.replace_all(&out, NoExpand(&self.file_name));
        let out = T_EXT.replace_all(&out, NoExpand(&self.ext));
        T_FILE_NAME_ONLY
            .replace_all(&out, NoExpand(&self.file_name_only))
            .into_owned()
    }
}
