//! External process execution.
//!
//! Formatters, linters, editors and diff tools are opaque to kiln: it only
//! decides when to launch them and on which file, then reports whether they
//! exited successfully.

use std::path::{Path, PathBuf};
use std::process::Command;

use globset::Glob;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::file_segments::FileSegments;

/// Launches external commands.
pub trait CommandRunner {
    /// Runs `command` through the shell inside `working_dir` and waits for it.
    ///
    /// # Returns
    /// * `bool` - true if the command exited successfully
    fn run(&self, command: &str, working_dir: &Path) -> bool;

    /// Opens a file or URL with the system's default handler.
    fn open(&self, target: &str) -> bool;
}

/// Runs commands through `sh -c` (or `cmd /C` on Windows).
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str, working_dir: &Path) -> bool {
        info!("cd {} && {}", working_dir.display(), command);

        let mut cmd = if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C");
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c");
            cmd
        };

        match cmd.arg(command).current_dir(working_dir).status() {
            Ok(status) => {
                if !status.success() {
                    error!("Command failed with status {status}: {command}");
                }
                status.success()
            }
            Err(e) => {
                error!("Failed to launch '{command}': {e}");
                false
            }
        }
    }

    fn open(&self, target: &str) -> bool {
        debug!("Opening {target}");
        match open::that(target) {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to open '{target}': {e}");
                false
            }
        }
    }
}

/// Command line templates for the external tools.
///
/// `formatter`, `linter` and `editor` accept the `$T_*$` file tokens. `diff`
/// is followed by the existing and the proposed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandSettings {
    pub formatter: String,
    pub linter: String,
    pub editor: String,
    pub diff: String,
}

impl Default for CommandSettings {
    fn default() -> Self {
        Self {
            formatter: "npx prettier --loglevel log --write $T_FILE$".to_string(),
            linter: "rubocop --format quiet -a $T_FILE$".to_string(),
            editor: "code $T_FILE$".to_string(),
            diff: "code --diff".to_string(),
        }
    }
}

/// Substitutes the shell-quoted segments of `file` into `template`.
pub fn command_for_file<P: AsRef<Path>>(template: &str, file: P) -> String {
    FileSegments::new(file)
        .map(quote)
        .interpolate(template)
}

/// Builds the diff command line comparing `existing` with `proposed`.
pub fn diff_command(diff: &str, existing: &Path, proposed: &Path) -> String {
    format!(
        "{} {} {}",
        diff,
        quote(&existing.to_string_lossy()),
        quote(&proposed.to_string_lossy())
    )
}

fn quote(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    shell_words::quote(value).into_owned()
}

/// RuboCop style lint invocation with validation.
///
/// An invalid command logs its problems and refuses to run.
#[derive(Debug, Clone, Default)]
pub struct LintCommand {
    pub file_pattern: String,
    /// `-a`: fix simple and safe issues
    pub fix_safe: bool,
    /// `-A`: also fix potentially unsafe issues
    pub fix_unsafe: bool,
    pub config_file: Option<PathBuf>,
    /// When false, output goes to `~/last_cop.txt`.
    pub show_console: bool,
    errors: Vec<String>,
}

impl LintCommand {
    pub fn new<S: Into<String>>(file_pattern: S) -> Self {
        Self { file_pattern: file_pattern.into(), ..Self::default() }
    }

    pub fn fix_safe(mut self, value: bool) -> Self {
        self.fix_safe = value;
        self
    }

    pub fn fix_unsafe(mut self, value: bool) -> Self {
        self.fix_unsafe = value;
        self
    }

    pub fn config_file<P: Into<PathBuf>>(mut self, file: P) -> Self {
        self.config_file = Some(file.into());
        self
    }

    pub fn show_console(mut self, value: bool) -> Self {
        self.show_console = value;
        self
    }

    /// Checks the pattern and config file against `working_dir`.
    pub fn validate(&mut self, working_dir: &Path) -> bool {
        self.errors.clear();

        if self.file_pattern.trim().is_empty() {
            self.guard("file_pattern is required".to_string());
        } else if !pattern_matches_any(&self.file_pattern, working_dir) {
            self.guard("file_pattern does not reference an existing file".to_string());
        }

        if let Some(config) = &self.config_file {
            let config = working_dir.join(config);
            if !config.exists() {
                self.guard(format!("Unknown RuboCop config file: {}", config.display()));
            }
        }

        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn cli_options(&self) -> Vec<String> {
        // quiet is simple minus the noise when there are no offenses
        let mut options = vec!["--format".to_string(), "quiet".to_string()];
        if self.fix_safe {
            options.push("-a".to_string());
        }
        if self.fix_unsafe {
            options.push("-A".to_string());
        }
        if let Some(config) = &self.config_file {
            options.push("--config".to_string());
            options.push(config.to_string_lossy().into_owned());
        }
        if !self.show_console {
            options.push("--out".to_string());
            options.push(shellexpand::tilde("~/last_cop.txt").into_owned());
        }
        options.push(self.file_pattern.clone());
        options
    }

    pub fn command_line(&self) -> String {
        let mut parts = vec!["rubocop".to_string()];
        parts.extend(self.cli_options());
        shell_words::join(parts)
    }

    /// Validates and runs the command. Returns false without launching
    /// anything when validation fails.
    pub fn execute(&mut self, runner: &dyn CommandRunner, working_dir: &Path) -> bool {
        if !self.validate(working_dir) {
            return false;
        }
        runner.run(&self.command_line(), working_dir)
    }

    fn guard(&mut self, message: String) {
        error!("{message}");
        self.errors.push(message);
    }
}

fn pattern_matches_any(pattern: &str, working_dir: &Path) -> bool {
    let is_glob = pattern.contains(['*', '?', '[', '{']);
    if !is_glob {
        return working_dir.join(pattern).exists();
    }

    let matcher = match Glob::new(pattern) {
        Ok(glob) => glob.compile_matcher(),
        Err(e) => {
            debug!("Invalid file pattern '{pattern}': {e}");
            return false;
        }
    };

    WalkDir::new(working_dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .any(|entry| {
            entry
                .path()
                .strip_prefix(working_dir)
                .map(|relative| matcher.is_match(relative))
                .unwrap_or(false)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_for_file_quotes_paths() {
        let command = command_for_file("fmt --write $T_FILE$", "/tmp/my file.txt");
        assert_eq!(command, "fmt --write '/tmp/my file.txt'");
    }

    #[test]
    fn test_lint_cli_options() {
        let lint = LintCommand::new("lib/a.rb").fix_safe(true).fix_unsafe(true).show_console(true);
        assert_eq!(
            lint.cli_options(),
            vec!["--format", "quiet", "-a", "-A", "lib/a.rb"]
        );
    }
}
