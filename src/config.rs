/*!
 * Shim Configuration
 * Environment-driven settings for the preload layer and launcher
 */

use std::path::PathBuf;

use crate::core::{ShimError, ShimResult};

/// Set to a true value to forward modes untouched
pub const ENV_DISABLE: &str = "CHMOD_SANITIZE_DISABLE";

/// Explicit path to the shim library
pub const ENV_LIBRARY: &str = "CHMOD_SANITIZE_LIB";

/// Set to a true value for JSON log output from the launcher
pub const ENV_TRACE_JSON: &str = "CHMOD_SANITIZE_TRACE_JSON";

/// Shim configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShimConfig {
    /// Strip setuid/setgid (the whole point; off only as an escape hatch)
    pub enabled: bool,
    /// Library to preload, when not next to the launcher
    pub library: Option<PathBuf>,
    /// JSON-formatted tracing output
    pub trace_json: bool,
}

impl Default for ShimConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            library: None,
            trace_json: false,
        }
    }
}

impl ShimConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> ShimResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<L>(lookup: L) -> ShimResult<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let disabled = parse_flag(ENV_DISABLE, lookup(ENV_DISABLE))?.unwrap_or(false);
        let trace_json = parse_flag(ENV_TRACE_JSON, lookup(ENV_TRACE_JSON))?.unwrap_or(false);
        let library = lookup(ENV_LIBRARY)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            enabled: !disabled,
            library,
            trace_json,
        })
    }
}

const TRUE_WORDS: [&str; 4] = ["1", "true", "yes", "on"];
const FALSE_WORDS: [&str; 4] = ["0", "false", "no", "off"];

/// Interpret a boolean setting without allocating
///
/// Returns `None` for anything that is not a recognized word, including
/// the empty string.
pub fn flag_value(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if TRUE_WORDS.iter().any(|word| raw.eq_ignore_ascii_case(word)) {
        Some(true)
    } else if FALSE_WORDS.iter().any(|word| raw.eq_ignore_ascii_case(word)) {
        Some(false)
    } else {
        None
    }
}

/// Parse a boolean setting; unset or empty means "not given"
fn parse_flag(key: &str, value: Option<String>) -> ShimResult<Option<bool>> {
    let Some(value) = value else {
        return Ok(None);
    };
    if value.trim().is_empty() {
        return Ok(None);
    }
    match flag_value(&value) {
        Some(flag) => Ok(Some(flag)),
        None => Err(ShimError::InvalidConfig {
            key: key.to_string(),
            value,
        }),
    }
}
