//! Configuration handling for kiln.
//! A configuration names the target folders, stacks the template folders and
//! selects the external tools. It can be built in code or loaded from a
//! `kiln.json` / `kiln.yml` / `kiln.yaml` file.

use crate::actions::ActionQueue;
use crate::commands::CommandSettings;
use crate::error::{Error, Result};
use crate::layered_folders::LayeredFolders;
use crate::named_folders::{expand_home, NamedFolders};
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Supported configuration file names
pub const CONFIG_FILES: [&str; 3] = ["kiln.json", "kiln.yml", "kiln.yaml"];

/// Everything a [`Builder`](crate::builder::Builder) needs besides its renderer
/// and command runner. Builders copy it, so one configuration can seed many
/// independent builders; keep several under names in a map if needed.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    pub target_folders: NamedFolders,
    pub template_folders: LayeredFolders,
    /// Initial current target folder key.
    pub current_folder: Option<String>,
    pub commands: CommandSettings,
    /// Missing content and template files fail instead of producing a message.
    pub strict: bool,
}

/// How a target folder is declared in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FolderSpec {
    /// `app: ~/dev/app`
    Path(String),
    /// `tests: { join: app, parts: [spec] }`
    Join {
        join: String,
        #[serde(default)]
        parts: Vec<String>,
    },
    /// `package_json: { alias: app }`
    Alias { alias: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplateFolderSpec {
    pub key: String,
    pub path: String,
}

/// The configuration file as written on disk.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Declared in order; aliases and joins may only refer to earlier keys.
    pub target_folders: IndexMap<String, FolderSpec>,
    /// Added in order, so the last entry is searched first.
    pub template_folders: Vec<TemplateFolderSpec>,
    pub current_folder: Option<String>,
    pub commands: CommandSettings,
    pub strict: bool,
    pub actions: Vec<serde_json::Value>,
}

impl ConfigFile {
    /// Builds the configuration, resolving relative folders against `base_dir`.
    ///
    /// # Errors
    /// * `Error::FolderNotFound` if an alias or join refers to an undeclared key
    /// * `Error::ConfigError` if `current_folder` is not a declared key
    pub fn configuration<P: AsRef<Path>>(&self, base_dir: P) -> Result<Configuration> {
        let base_dir = base_dir.as_ref();
        let mut config = Configuration {
            current_folder: self.current_folder.clone(),
            commands: self.commands.clone(),
            strict: self.strict,
            ..Configuration::default()
        };

        for (key, spec) in &self.target_folders {
            match spec {
                FolderSpec::Path(path) => {
                    config.target_folders.add(key.as_str(), resolve_folder(base_dir, path));
                }
                FolderSpec::Join { join, parts } => {
                    let folder = config.target_folders.join(join, parts)?;
                    config.target_folders.add(key.as_str(), folder);
                }
                FolderSpec::Alias { alias } => {
                    config.target_folders.alias(key.as_str(), alias)?;
                }
            }
        }

        for spec in &self.template_folders {
            config
                .template_folders
                .add(spec.key.as_str(), resolve_folder(base_dir, &spec.path));
        }

        if let Some(current) = &config.current_folder {
            if !config.target_folders.contains(current) {
                return Err(Error::ConfigError(format!(
                    "current_folder '{current}' is not a target folder"
                )));
            }
        }

        Ok(config)
    }

    /// The configured action records, unplayed unless marked otherwise.
    pub fn actions(&self) -> Result<ActionQueue> {
        ActionQueue::from_values(self.actions.iter().cloned())
    }
}

fn resolve_folder(base_dir: &Path, folder: &str) -> PathBuf {
    let folder = expand_home(folder);
    if folder.is_absolute() {
        folder
    } else {
        base_dir.join(folder)
    }
}

/// Loads configuration from a directory, trying multiple file formats.
///
/// # Arguments
/// * `config_dir` - Directory containing the configuration file
/// * `config_files` - List of configuration files to try
///
/// # Returns
/// * `Result<String>` - Contents of the first found configuration file
///
/// # Errors
/// * `Error::ConfigError` if no valid config file exists
pub fn load_config<P: AsRef<Path>>(config_dir: P, config_files: &[&str]) -> Result<String> {
    for file in config_files {
        let config_path = config_dir.as_ref().join(file);
        if config_path.exists() {
            debug!("Loading configuration from {}", config_path.display());
            return Ok(std::fs::read_to_string(&config_path)?);
        }
    }

    Err(Error::ConfigError(format!(
        "No configuration file found (tried: {})",
        config_files.join(", ")
    )))
}

/// Parses configuration content, trying JSON first and YAML second.
///
/// # Errors
/// * `Error::ConfigError` if parsing fails
pub fn parse_config(content: &str) -> Result<ConfigFile> {
    match serde_json::from_str(content) {
        Ok(config) => Ok(config),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration format: {e}"))),
    }
}

/// Loads and parses the configuration file in `config_dir`.
pub fn get_config<P: AsRef<Path>>(config_dir: P) -> Result<ConfigFile> {
    let content = load_config(config_dir, &CONFIG_FILES)?;
    parse_config(&content)
}
