/*!
 * Mode Argument Type
 * The permission mode as callers hand it to a permission-change call
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use super::octal::parse_octal;
use crate::vfs::types::{VfsError, VfsResult};

/// Mode argument of a permission-change call
///
/// Callers pass either a numeric bitmask or an octal text token such as
/// `"0755"`. Serialized untagged, so a JSON number or string maps directly
/// onto the matching variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModeArg {
    Numeric(u32),
    Text(String),
}

impl ModeArg {
    /// Numeric value of this mode, parsing text as octal
    ///
    /// This is the conversion a backend performs before touching the
    /// filesystem. Text that is not an octal token is rejected here, by the
    /// operation, not by the sanitizer.
    pub fn to_bits(&self) -> VfsResult<u32> {
        match self {
            ModeArg::Numeric(bits) => Ok(*bits),
            ModeArg::Text(token) => parse_octal(token).ok_or_else(|| {
                VfsError::InvalidArgument(format!(
                    "mode must be an integer or an octal string, got {:?}",
                    token
                ))
            }),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, ModeArg::Numeric(_))
    }
}

impl From<u32> for ModeArg {
    fn from(bits: u32) -> Self {
        ModeArg::Numeric(bits)
    }
}

impl From<&str> for ModeArg {
    fn from(token: &str) -> Self {
        ModeArg::Text(token.to_string())
    }
}

impl From<String> for ModeArg {
    fn from(token: String) -> Self {
        ModeArg::Text(token)
    }
}

impl fmt::Display for ModeArg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ModeArg::Numeric(bits) => write!(f, "0o{:o}", bits),
            ModeArg::Text(token) => write!(f, "{:?}", token),
        }
    }
}
