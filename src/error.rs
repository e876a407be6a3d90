//! Error handling for kiln.
//! Defines the error type and result alias used throughout the crate.

use thiserror::Error;

/// Errors that can occur while resolving folders, content and actions.
///
/// Missing content and template files are normally reported inline as
/// generated content. `ContentNotFound` and `TemplateNotFound` are only
/// raised when strict resolution is enabled.
#[derive(Error, Debug)]
pub enum Error {
    /// A folder key was looked up before it was registered.
    #[error("Folder not found, this folder key not found: {key}")]
    FolderNotFound { key: String },

    #[error("content not found: {reference}")]
    ContentNotFound { reference: String },

    #[error("template not found: {reference}")]
    TemplateNotFound { reference: String },

    /// `add_file` was called without any content source.
    #[error("No content source supplied for '{file}'; use `touch` to create an empty file")]
    MissingContent { file: String },

    /// Represents errors that occur during file system operations.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Represents errors that occur during template rendering.
    #[error("Template rendering error: {0}")]
    MinijinjaError(#[from] minijinja::Error),

    /// Represents errors that occur during configuration parsing or processing.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An action record could not be decoded or executed.
    #[error("Action error: {0}")]
    ActionError(String),
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
