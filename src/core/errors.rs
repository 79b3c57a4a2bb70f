/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

pub use crate::vfs::types::{VfsError, VfsResult};

/// Shim result type
pub type ShimResult<T> = Result<T, ShimError>;

/// Errors raised while configuring or activating the shim
///
/// The sanitizer itself never fails; these cover the launcher and
/// configuration around it.
#[derive(Error, Debug, Diagnostic)]
pub enum ShimError {
    #[error("No command given")]
    #[diagnostic(
        code(shim::missing_command),
        help("Usage: chmod-sanitize <command> [args...]")
    )]
    MissingCommand,

    #[error("Shim library not found at {}", .0.display())]
    #[diagnostic(
        code(shim::library_not_found),
        help("Build the cdylib with `--features preload` or point CHMOD_SANITIZE_LIB at it.")
    )]
    LibraryNotFound(PathBuf),

    #[error("Invalid value {value:?} for {key}")]
    #[diagnostic(
        code(shim::invalid_config),
        help("Boolean settings accept 1/0, true/false, yes/no, on/off.")
    )]
    InvalidConfig { key: String, value: String },

    #[error("Invalid argument: {0}")]
    #[diagnostic(
        code(shim::invalid_argument),
        help("Arguments and paths must not contain NUL bytes.")
    )]
    InvalidArgument(String),

    #[error("Failed to execute {command}: {reason}")]
    #[diagnostic(
        code(shim::exec_failed),
        help("Check that the command exists and is executable on PATH.")
    )]
    Exec { command: String, reason: String },
}
