//! The builder: resolves target paths and content, writes files and runs the
//! external tools that post-process them.
//!
//! Configuration happens up front through [`Configuration`] or the `add_*`
//! methods. Side-effecting calls return `Result<&mut Self>` so they chain and
//! run strictly in call order:
//!
//! ```no_run
//! # use kiln::{builder::{AddFileOptions, Builder}, commands::ShellRunner,
//! #     config::Configuration, content::ContentOptions, renderer::MiniJinjaRenderer};
//! # fn main() -> kiln::error::Result<()> {
//! let renderer = MiniJinjaRenderer::new();
//! let runner = ShellRunner::new();
//! let mut config = Configuration::default();
//! config.target_folders.add("app", "/tmp/app");
//!
//! let mut builder = Builder::new(&config, &renderer, &runner);
//! builder
//!     .add_file("README.md", AddFileOptions::new(ContentOptions::template("# {{ name }}").with("name", "app")))?
//!     .add_file("src/main.rs", AddFileOptions::new(ContentOptions::template_file("main.rs")))?;
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::commands::{command_for_file, diff_command, CommandRunner, CommandSettings, LintCommand};
use crate::config::Configuration;
use crate::content::{ContentOptions, ContentResolver};
use crate::error::{Error, Result};
use crate::layered_folders::LayeredFolders;
use crate::named_folders::NamedFolders;
use crate::renderer::TemplateRenderer;

/// What to do when the target file already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnExist {
    /// Leave the existing file alone.
    #[default]
    Skip,
    /// Replace the existing file.
    Overwrite,
    /// Do nothing if the content is identical, otherwise open a diff between
    /// the existing file and the new content and leave the file alone.
    Compare,
}

/// Result of a single file write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Overwritten,
    Skipped,
    Unchanged,
    /// The content differs and a diff was opened for manual resolution.
    Conflict,
}

/// Options for [`Builder::add_file`].
///
/// `pretty`, `cop` and `open` trigger their side effect when present, whatever
/// their value: `pretty: false` still runs the formatter. The formatter and
/// linter only run when the file was actually written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddFileOptions {
    /// Target folder key; the current folder when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(default)]
    pub on_exist: OnExist,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pretty: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cop: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<bool>,
    /// Create an empty file when no content source is given.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub touch: bool,
    #[serde(flatten)]
    pub content: ContentOptions,
}

impl AddFileOptions {
    pub fn new(content: ContentOptions) -> Self {
        Self { content, ..Self::default() }
    }

    /// Options for an empty file.
    pub fn touch() -> Self {
        Self { touch: true, ..Self::default() }
    }

    pub fn folder<S: Into<String>>(mut self, folder: S) -> Self {
        self.folder = Some(folder.into());
        self
    }

    pub fn on_exist(mut self, on_exist: OnExist) -> Self {
        self.on_exist = on_exist;
        self
    }

    pub fn pretty(mut self, value: bool) -> Self {
        self.pretty = Some(value);
        self
    }

    pub fn cop(mut self, value: bool) -> Self {
        self.cop = Some(value);
        self
    }

    pub fn open(mut self, value: bool) -> Self {
        self.open = Some(value);
        self
    }
}

/// Owns the target folders and template folders of one generation run.
///
/// Cloning a builder gives it independent copies of both folder sets; the
/// renderer and command runner are shared.
#[derive(Clone)]
pub struct Builder<'a> {
    target_folders: NamedFolders,
    template_folders: LayeredFolders,
    current_folder: Option<String>,
    commands: CommandSettings,
    strict: bool,
    renderer: &'a dyn TemplateRenderer,
    runner: &'a dyn CommandRunner,

    last_output_file: Option<PathBuf>,
    last_output_folder: Option<PathBuf>,
    last_template_file: Option<PathBuf>,
    last_write: Option<WriteOutcome>,
    last_command_success: Option<bool>,
}

impl<'a> Builder<'a> {
    /// Creates a builder from a copy of `config`.
    ///
    /// The current folder is `config.current_folder` or, when unset, the
    /// first registered target folder.
    pub fn new(
        config: &Configuration,
        renderer: &'a dyn TemplateRenderer,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        let current_folder = config
            .current_folder
            .clone()
            .or_else(|| config.target_folders.keys().next().map(str::to_string));

        Self {
            target_folders: config.target_folders.clone(),
            template_folders: config.template_folders.clone(),
            current_folder,
            commands: config.commands.clone(),
            strict: config.strict,
            renderer,
            runner,
            last_output_file: None,
            last_output_folder: None,
            last_template_file: None,
            last_write: None,
            last_command_success: None,
        }
    }

    // Configuration
    // ----------------------------------------------------------------------

    pub fn add_target_folder<K: Into<String>, P: AsRef<Path>>(&mut self, key: K, folder: P) -> &mut Self {
        let key = key.into();
        if self.current_folder.is_none() {
            self.current_folder = Some(key.clone());
        }
        self.target_folders.add(key, folder);
        self
    }

    pub fn add_template_folder<K: Into<String>, P: AsRef<Path>>(&mut self, key: K, folder: P) -> &mut Self {
        self.template_folders.add(key, folder);
        self
    }

    /// Makes `key` the folder used by calls that don't name one.
    ///
    /// # Errors
    /// * `Error::FolderNotFound` if `key` is not a registered target folder
    pub fn set_current_folder(&mut self, key: &str) -> Result<&mut Self> {
        self.target_folders.get(key)?;
        debug!("Current folder: {key}");
        self.current_folder = Some(key.to_string());
        Ok(self)
    }

    pub fn current_folder_key(&self) -> Result<&str> {
        self.current_folder
            .as_deref()
            .ok_or_else(|| Error::ConfigError("no current target folder is set".to_string()))
    }

    pub fn target_folders(&self) -> &NamedFolders {
        &self.target_folders
    }

    pub fn target_folders_mut(&mut self) -> &mut NamedFolders {
        &mut self.target_folders
    }

    pub fn template_folders(&self) -> &LayeredFolders {
        &self.template_folders
    }

    pub fn template_folders_mut(&mut self) -> &mut LayeredFolders {
        &mut self.template_folders
    }

    // Resolution
    // ----------------------------------------------------------------------

    /// Folder registered under `key`, or the current folder.
    pub fn target_folder(&self, key: Option<&str>) -> Result<&Path> {
        let key = match key {
            Some(key) => key,
            None => self.current_folder_key()?,
        };
        self.target_folders.get(key)
    }

    /// Resolves `file` against the folder `key` (or the current folder).
    /// Absolute paths are returned unchanged and no folder is looked up.
    pub fn target_file<P: AsRef<Path>>(&self, file: P, key: Option<&str>) -> Result<PathBuf> {
        let file = file.as_ref();
        if file.is_absolute() {
            return Ok(file.to_path_buf());
        }
        Ok(self.target_folder(key)?.join(file))
    }

    pub fn template_folder(&self, key: &str) -> Result<&Path> {
        self.template_folders.get(key)
    }

    /// The most specific template folder copy of `file`.
    pub fn find_template_file<P: AsRef<Path>>(&self, file: P) -> Option<PathBuf> {
        self.template_folders.find_file(file)
    }

    /// Resolves `opts` into content. `Ok(None)` when no source was supplied.
    pub fn process_content(&self, opts: &ContentOptions) -> Result<Option<String>> {
        ContentResolver::new(&self.template_folders, self.renderer)
            .strict(self.strict)
            .process(opts)
    }

    // Files and folders
    // ----------------------------------------------------------------------

    /// Writes `file` with content resolved from `opts`, honouring `opts.on_exist`.
    ///
    /// # Errors
    /// * `Error::FolderNotFound` if the folder key is unknown
    /// * `Error::MissingContent` if no content source is given and `touch` is not set
    pub fn add_file<P: AsRef<Path>>(&mut self, file: P, opts: AddFileOptions) -> Result<&mut Self> {
        let file = file.as_ref();
        let target = self.target_file(file, opts.folder.as_deref())?;

        let content = match self.process_content(&opts.content)? {
            Some(content) => content,
            None if opts.touch => String::new(),
            None => {
                return Err(Error::MissingContent { file: file.display().to_string() });
            }
        };

        self.last_template_file = opts
            .content
            .template_file
            .as_ref()
            .and_then(|t| self.template_folders.find_file(t));

        let outcome = self.write_file(&target, &content, opts.on_exist)?;
        self.last_write = Some(outcome);
        self.last_output_folder = target.parent().map(Path::to_path_buf);
        self.last_output_file = Some(target.clone());

        // Files left alone by the conflict policy are not reformatted.
        let written = matches!(outcome, WriteOutcome::Created | WriteOutcome::Overwritten);
        if written && opts.pretty.is_some() {
            let command = self.commands.formatter.clone();
            self.run_file_command(&command, &target)?;
        }
        if written && opts.cop.is_some() {
            let command = self.commands.linter.clone();
            self.run_file_command(&command, &target)?;
        }
        if opts.open.is_some() {
            self.open_file(&target, None)?;
        }

        Ok(self)
    }

    fn write_file(&mut self, target: &Path, content: &str, on_exist: OnExist) -> Result<WriteOutcome> {
        if !target.exists() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(target, content)?;
            info!("Created: '{}'", target.display());
            return Ok(WriteOutcome::Created);
        }

        match on_exist {
            OnExist::Skip => {
                debug!("Skipped existing file: '{}'", target.display());
                Ok(WriteOutcome::Skipped)
            }
            OnExist::Overwrite => {
                fs::write(target, content)?;
                info!("Overwritten: '{}'", target.display());
                Ok(WriteOutcome::Overwritten)
            }
            OnExist::Compare => {
                if fs::read(target)? == content.as_bytes() {
                    debug!("Unchanged: '{}'", target.display());
                    return Ok(WriteOutcome::Unchanged);
                }
                self.last_command_success = Some(self.open_diff(target, content)?);
                Ok(WriteOutcome::Conflict)
            }
        }
    }

    /// Writes the proposed content to a kept temp file and opens the diff tool
    /// on it and the existing file. The temp file outlives the call because
    /// diff tools may return before the user is done.
    ///
    /// # Returns
    /// * `Result<bool>` - whether the diff tool exited successfully
    fn open_diff(&self, target: &Path, content: &str) -> Result<bool> {
        let file_name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "kiln".to_string());

        let mut proposed = tempfile::Builder::new()
            .prefix(&format!("{file_name}."))
            .tempfile()?;
        proposed.write_all(content.as_bytes())?;
        let (_, proposed_path) = proposed.keep().map_err(|e| Error::IoError(e.error))?;

        warn!(
            "Conflict: '{}' differs from generated content in '{}'",
            target.display(),
            proposed_path.display()
        );

        let working_dir = target.parent().unwrap_or_else(|| Path::new("."));
        let command = diff_command(&self.commands.diff, target, &proposed_path);
        Ok(self.runner.run(&command, working_dir))
    }

    /// Deletes `file` if it exists.
    pub fn delete_file<P: AsRef<Path>>(&mut self, file: P, key: Option<&str>) -> Result<&mut Self> {
        let target = self.target_file(file, key)?;
        if target.exists() {
            fs::remove_file(&target)?;
            info!("Deleted: '{}'", target.display());
        } else {
            debug!("Nothing to delete at '{}'", target.display());
        }
        Ok(self)
    }

    /// Creates the folder `key` (or the current folder), optionally with a sub path.
    pub fn make_folder(&mut self, key: Option<&str>, sub_path: Option<&str>) -> Result<&mut Self> {
        let mut folder = self.target_folder(key)?.to_path_buf();
        if let Some(sub_path) = sub_path {
            folder.push(sub_path);
        }
        fs::create_dir_all(&folder)?;
        self.last_output_folder = Some(folder);
        Ok(self)
    }

    // External commands
    // ----------------------------------------------------------------------

    /// Runs `command` inside the current target folder, creating it if needed.
    pub fn run_command(&mut self, command: &str) -> Result<&mut Self> {
        let folder = self.target_folder(None)?.to_path_buf();
        fs::create_dir_all(&folder)?;
        self.last_command_success = Some(self.runner.run(command, &folder));
        Ok(self)
    }

    /// Runs a script file located relative to the folder `key` (or the
    /// current folder), from that folder.
    pub fn run_script<P: AsRef<Path>>(&mut self, script: P, key: Option<&str>) -> Result<&mut Self> {
        let script = self.target_file(script, key)?;
        let working_dir = script
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let command = command_for_file("$T_FILE$", &script);
        self.last_command_success = Some(self.runner.run(&command, &working_dir));
        Ok(self)
    }

    /// Runs the configured formatter against `file`.
    pub fn run_prettier<P: AsRef<Path>>(&mut self, file: P, key: Option<&str>) -> Result<&mut Self> {
        let target = self.target_file(file, key)?;
        let command = self.commands.formatter.clone();
        self.run_file_command(&command, &target)?;
        Ok(self)
    }

    /// Validates and runs a lint command from the current target folder.
    pub fn run_cop(&mut self, mut lint: LintCommand) -> Result<&mut Self> {
        let folder = self.target_folder(None)?.to_path_buf();
        self.last_command_success = Some(lint.execute(self.runner, &folder));
        Ok(self)
    }

    /// Opens `file` with the configured editor.
    pub fn open_file<P: AsRef<Path>>(&mut self, file: P, key: Option<&str>) -> Result<&mut Self> {
        let target = self.target_file(file, key)?;
        let command = self.commands.editor.clone();
        self.run_file_command(&command, &target)?;
        Ok(self)
    }

    /// Opens a URL or file with the system's default handler.
    pub fn browse(&mut self, target: &str) -> &mut Self {
        self.last_command_success = Some(self.runner.open(target));
        self
    }

    fn run_file_command(&mut self, template: &str, file: &Path) -> Result<()> {
        let working_dir = match file.parent() {
            Some(parent) => parent.to_path_buf(),
            None => self.target_folder(None)?.to_path_buf(),
        };
        let command = command_for_file(template, file);
        self.last_command_success = Some(self.runner.run(&command, &working_dir));
        Ok(())
    }

    // Diagnostics
    // ----------------------------------------------------------------------

    pub fn last_output_file(&self) -> Option<&Path> {
        self.last_output_file.as_deref()
    }

    pub fn last_output_folder(&self) -> Option<&Path> {
        self.last_output_folder.as_deref()
    }

    pub fn last_template_file(&self) -> Option<&Path> {
        self.last_template_file.as_deref()
    }

    pub fn last_write(&self) -> Option<WriteOutcome> {
        self.last_write
    }

    /// Exit status of the most recent external command, if any ran.
    pub fn last_command_success(&self) -> Option<bool> {
        self.last_command_success
    }

    /// Logs the target folders and the template search order.
    pub fn debug(&self) {
        debug!("target folders (current: {})", self.current_folder.as_deref().unwrap_or("-"));
        for (key, folder) in self.target_folders.iter() {
            debug!("{:>30} : {}", key, folder.display());
        }
        debug!("template folders (search order)");
        for (key, folder) in self
            .template_folders
            .ordered_keys()
            .into_iter()
            .zip(self.template_folders.ordered_folders())
        {
            debug!("{:>30} : {}", key, folder.display());
        }
    }
}
