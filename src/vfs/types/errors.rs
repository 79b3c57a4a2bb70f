/*!
 * VFS Error Types
 * Structured, type-safe error handling for permission-change operations
 */

use nix::errno::Errno;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// VFS operation result
///
/// # Must Use
/// Permission changes can fail and must be handled
#[must_use = "VFS operations can fail and must be handled"]
pub type VfsResult<T> = Result<T, VfsError>;

/// VFS errors with structured, type-safe error handling
///
/// All error variants include context strings that should be non-empty.
/// Serialization uses tagged enum pattern for type safety.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum VfsError {
    #[error("Not found: {0}")]
    NotFound(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Permission denied: {0}")]
    PermissionDenied(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Bad file descriptor: {0}")]
    BadDescriptor(i32),

    #[error("Not supported: {0}")]
    NotSupported(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Read-only filesystem")]
    ReadOnly,

    #[error("I/O error: {0}")]
    IoError(#[serde(deserialize_with = "deserialize_nonempty_string")] String),
}

impl VfsError {
    /// Map an OS error from a permission-change call
    pub fn from_errno(errno: Errno, context: impl Into<String>) -> Self {
        let context = context.into();
        match errno {
            Errno::ENOENT | Errno::ENOTDIR => VfsError::NotFound(context),
            Errno::EPERM | Errno::EACCES => VfsError::PermissionDenied(context),
            Errno::EINVAL => VfsError::InvalidArgument(context),
            Errno::EROFS => VfsError::ReadOnly,
            Errno::ENOTSUP | Errno::ENOSYS => VfsError::NotSupported(context),
            _ => VfsError::IoError(format!("{}: {}", context, errno.desc())),
        }
    }
}

/// Deserialize and validate non-empty string for error messages
pub(super) fn deserialize_nonempty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.is_empty() {
        return Err(serde::de::Error::custom("error message must not be empty"));
    }
    Ok(s)
}
