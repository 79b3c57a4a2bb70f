/*!
 * Launcher
 * Runs a command with the shim library preloaded
 */

use nix::unistd::execvp;
use std::ffi::{CString, OsStr, OsString};
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::ShimConfig;
use crate::core::{ShimError, ShimResult};

/// Environment variable the dynamic loader reads
pub const PRELOAD_VAR: &str = "LD_PRELOAD";

/// File name of the shim library produced by the cdylib target
pub const LIBRARY_FILE: &str = "libchmod_sanitize.so";

/// A command ready to be executed with the shim preloaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launch {
    pub program: OsString,
    pub args: Vec<OsString>,
    /// New value of the preload variable, `None` to leave it alone
    pub preload: Option<OsString>,
}

impl Launch {
    /// Work out what to run
    ///
    /// `argv` excludes the launcher itself. `existing` is the current value
    /// of the preload variable and `exe` the launcher's own path, used to
    /// find the library next to it.
    pub fn plan(
        config: &ShimConfig,
        argv: Vec<OsString>,
        existing: Option<OsString>,
        exe: Option<&Path>,
    ) -> ShimResult<Self> {
        let mut argv = argv.into_iter();
        let program = argv.next().ok_or(ShimError::MissingCommand)?;
        let args = argv.collect();

        let preload = if config.enabled {
            let library = locate_library(config, exe)?;
            Some(compose_preload(&library, existing))
        } else {
            warn!("Sanitizing disabled, running command without the shim");
            None
        };

        Ok(Self {
            program,
            args,
            preload,
        })
    }

    /// Replace the current process with the planned command
    ///
    /// Only returns on failure.
    pub fn exec(self) -> ShimError {
        let command = self.program.to_string_lossy().into_owned();

        let argv = match std::iter::once(self.program)
            .chain(self.args)
            .map(to_cstring)
            .collect::<ShimResult<Vec<_>>>()
        {
            Ok(argv) => argv,
            Err(e) => return e,
        };

        if let Some(preload) = &self.preload {
            debug!(preload = %preload.to_string_lossy(), "Setting {}", PRELOAD_VAR);
            std::env::set_var(PRELOAD_VAR, preload);
        }

        debug!(command = %command, args = argv.len() - 1, "Executing");
        match execvp(&argv[0], &argv) {
            Ok(never) => match never {},
            Err(errno) => ShimError::Exec {
                command,
                reason: errno.desc().to_string(),
            },
        }
    }
}

/// Find the shim library
///
/// An explicit path from the configuration must exist. Otherwise the
/// library is looked up next to the launcher and in a sibling `lib/`.
pub fn locate_library(config: &ShimConfig, exe: Option<&Path>) -> ShimResult<PathBuf> {
    if let Some(library) = &config.library {
        return if library.is_file() {
            Ok(library.clone())
        } else {
            Err(ShimError::LibraryNotFound(library.clone()))
        };
    }

    let dir = exe
        .and_then(Path::parent)
        .ok_or_else(|| ShimError::LibraryNotFound(PathBuf::from(LIBRARY_FILE)))?;
    let candidates = [
        dir.join(LIBRARY_FILE),
        dir.join("..").join("lib").join(LIBRARY_FILE),
    ];

    candidates
        .iter()
        .find(|candidate| candidate.is_file())
        .cloned()
        .ok_or_else(|| ShimError::LibraryNotFound(candidates[0].clone()))
}

/// Put the library in front of the existing preload list
///
/// The loader accepts both `:` and whitespace as separators. A list that
/// already names the library is returned untouched.
pub fn compose_preload(library: &Path, existing: Option<OsString>) -> OsString {
    let library = library.as_os_str();
    let existing = existing.unwrap_or_default();

    let already = existing
        .as_bytes()
        .split(|b| *b == b':' || b.is_ascii_whitespace())
        .any(|entry| entry == library.as_bytes());
    if already {
        return existing;
    }

    let mut preload = library.to_os_string();
    if !existing.as_bytes().iter().all(|b| *b == b':' || b.is_ascii_whitespace()) {
        preload.push(":");
        preload.push(&existing);
    }
    preload
}

fn to_cstring(arg: OsString) -> ShimResult<CString> {
    CString::new(arg.into_vec()).map_err(|e| {
        let lossy = OsStr::from_bytes(&e.into_vec()).to_string_lossy().into_owned();
        ShimError::InvalidArgument(format!("{:?} contains a NUL byte", lossy))
    })
}
