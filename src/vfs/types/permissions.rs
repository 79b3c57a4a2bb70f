/*!
 * VFS Permissions
 * Unix-style file permissions with validation
 */

use serde::{Deserialize, Deserializer, Serialize};

use crate::mode::{ModeArg, S_ISGID, S_ISUID};

/// File permissions (Unix-style) with validation
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(deserialize_with = "deserialize_permission_mode")]
    pub mode: u32,
}

impl Permissions {
    /// Create permissions with mode validation (masks to valid bits)
    #[inline]
    #[must_use]
    pub const fn new(mode: u32) -> Self {
        Self {
            mode: mode & 0o7777,
        }
    }

    /// Resolve a mode argument into permissions
    pub fn from_arg(mode: &ModeArg) -> super::VfsResult<Self> {
        mode.to_bits().map(Self::new)
    }

    /// Create read-write permissions (0o644)
    #[inline]
    #[must_use]
    pub const fn readwrite() -> Self {
        Self { mode: 0o644 }
    }

    /// Create executable permissions (0o755)
    #[inline]
    #[must_use]
    pub const fn executable() -> Self {
        Self { mode: 0o755 }
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_setuid(&self) -> bool {
        self.mode & S_ISUID != 0
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_setgid(&self) -> bool {
        self.mode & S_ISGID != 0
    }

    /// Check if any execute bit is set
    #[inline(always)]
    #[must_use]
    pub const fn is_executable(&self) -> bool {
        self.mode & 0o111 != 0
    }

    /// Get user permissions (rwx)
    #[inline]
    #[must_use]
    pub const fn user_permissions(&self) -> u32 {
        (self.mode >> 6) & 0o7
    }

    /// Get group permissions (rwx)
    #[inline]
    #[must_use]
    pub const fn group_permissions(&self) -> u32 {
        (self.mode >> 3) & 0o7
    }

    /// Get other permissions (rwx)
    #[inline]
    #[must_use]
    pub const fn other_permissions(&self) -> u32 {
        self.mode & 0o7
    }
}

/// Deserialize and validate permission mode (must be <= 0o7777)
fn deserialize_permission_mode<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let mode = u32::deserialize(deserializer)?;
    if mode > 0o7777 {
        return Err(serde::de::Error::custom(format!(
            "invalid permission mode: 0o{:o} exceeds maximum 0o7777",
            mode
        )));
    }
    Ok(mode)
}

impl Default for Permissions {
    fn default() -> Self {
        Self::readwrite()
    }
}
