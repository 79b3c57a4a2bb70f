/*!
 * Preload Layer
 * Host-level activation: sanitizing the mode of libc permission-change calls
 *
 * Loaded through LD_PRELOAD, the cdylib built with the `preload` feature
 * exports `chmod`, `fchmod`, `fchmodat` and `lchmod`. Each one rewrites the
 * mode and hands the call to the next definition in the lookup order.
 * The switch and the next definitions are settled when the library loads.
 * Everything here except the exported symbols is always compiled.
 */

#[cfg(all(feature = "preload", target_os = "linux"))]
mod interpose;

use nix::libc::{self, c_void, mode_t};
use std::ffi::{CStr, CString};
use std::ptr::NonNull;
use std::sync::OnceLock;

use crate::config::flag_value;
use crate::mode::sanitize_bits;

/// `ENV_DISABLE`, NUL-terminated for `getenv`
const DISABLE_VAR: &[u8] = b"CHMOD_SANITIZE_DISABLE\0";

/// Resolve `name` to the next definition after this object
///
/// Returns `None` when no later object defines the symbol.
pub fn lookup_next(name: &str) -> Option<NonNull<c_void>> {
    let cname = CString::new(name).ok()?;
    // SAFETY: cname is a valid NUL-terminated string for the duration of the call
    NonNull::new(unsafe { libc::dlsym(libc::RTLD_NEXT, cname.as_ptr()) })
}

/// Whether the preload layer strips bits in this process
///
/// Read once, from the disable switch alone. Other settings never turn the
/// sanitizer off, and a value that is not a recognized word keeps it on.
pub fn enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| !disabled_by_env())
}

/// Read the disable switch from the C environment without allocating
fn disabled_by_env() -> bool {
    // SAFETY: DISABLE_VAR is NUL-terminated; getenv returns null or a C string
    let raw = unsafe { libc::getenv(DISABLE_VAR.as_ptr().cast()) };
    if raw.is_null() {
        return false;
    }
    // SAFETY: non-null getenv results point at a NUL-terminated string
    disabled_by(unsafe { CStr::from_ptr(raw) }.to_bytes())
}

/// Whether a raw value of the disable switch turns sanitizing off
#[must_use]
pub fn disabled_by(value: &[u8]) -> bool {
    std::str::from_utf8(value)
        .ok()
        .and_then(flag_value)
        .unwrap_or(false)
}

/// Failure of an export whose next definition is missing: -1 with ENOSYS
#[cfg(any(target_os = "linux", target_os = "android"))]
#[cfg_attr(not(feature = "preload"), allow(dead_code))]
pub(crate) fn fail_unresolved() -> libc::c_int {
    // SAFETY: __errno_location always returns a valid thread-local pointer
    unsafe {
        *libc::__errno_location() = libc::ENOSYS;
    }
    -1
}

/// Mode handed to the next definition
#[inline]
pub fn forward_mode(mode: mode_t) -> mode_t {
    rewrite_mode(mode, enabled())
}

#[inline(always)]
#[must_use]
pub fn rewrite_mode(mode: mode_t, enabled: bool) -> mode_t {
    if enabled {
        sanitize_bits(u32::from(mode)) as mode_t
    } else {
        mode
    }
}
