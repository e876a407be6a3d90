//! kiln resolves where generated content goes and what that content is,
//! then writes it with a per-file conflict policy. Operations can run
//! directly or be recorded as data and replayed later.

/// Deferred builder operations and their replay queue
pub mod actions;

/// Builder facade: target paths, file writes and the conflict policy
pub mod builder;

/// Command-line interface module for the kiln binary
pub mod cli;

/// External formatter, linter, editor and diff invocation
pub mod commands;

/// Configuration handling, in code or from kiln.json / kiln.yml / kiln.yaml
pub mod config;

/// Content and template source resolution
pub mod content;

/// Error types and handling
pub mod error;

/// Path segments and `$T_*$` token interpolation
pub mod file_segments;

/// Priority-ordered template folder search
pub mod layered_folders;

/// Output folders addressed by key
pub mod named_folders;

/// Template rendering
pub mod renderer;
