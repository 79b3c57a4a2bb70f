/*!
 * Interposed Symbols
 * C ABI replacements for the libc permission-change calls
 */

#![allow(clippy::missing_safety_doc)]

use nix::libc::{c_char, c_int, c_void, mode_t};
use std::sync::OnceLock;

use super::{enabled, fail_unresolved, forward_mode, lookup_next};

type ChmodFn = unsafe extern "C" fn(*const c_char, mode_t) -> c_int;
type FchmodFn = unsafe extern "C" fn(c_int, mode_t) -> c_int;
type FchmodatFn = unsafe extern "C" fn(c_int, *const c_char, mode_t, c_int) -> c_int;

macro_rules! real_symbol {
    ($fn_name:ident, $sym_name:literal, $ty:ty) => {
        fn $fn_name() -> Option<$ty> {
            static SLOT: OnceLock<Option<$ty>> = OnceLock::new();
            *SLOT.get_or_init(|| {
                // SAFETY: the symbol is the libc function with this exact signature
                lookup_next($sym_name)
                    .map(|sym| unsafe { std::mem::transmute::<*mut c_void, $ty>(sym.as_ptr()) })
            })
        }
    };
}

real_symbol!(real_chmod, "chmod", ChmodFn);
real_symbol!(real_fchmod, "fchmod", FchmodFn);
real_symbol!(real_fchmodat, "fchmodat", FchmodatFn);
real_symbol!(real_lchmod, "lchmod", ChmodFn);

/// Settle the switch and every next definition while the library loads.
/// After this the exports neither allocate nor read the environment, which
/// keeps them usable in a child forked from a multithreaded parent.
extern "C" fn resolve_at_load() {
    let _ = enabled();
    let _ = real_chmod();
    let _ = real_fchmod();
    let _ = real_fchmodat();
    let _ = real_lchmod();
}

#[used]
#[link_section = ".init_array"]
static RESOLVE_AT_LOAD: extern "C" fn() = resolve_at_load;

#[no_mangle]
pub unsafe extern "C" fn chmod(path: *const c_char, mode: mode_t) -> c_int {
    match real_chmod() {
        Some(real) => unsafe { real(path, forward_mode(mode)) },
        None => fail_unresolved(),
    }
}

#[no_mangle]
pub unsafe extern "C" fn fchmod(fd: c_int, mode: mode_t) -> c_int {
    match real_fchmod() {
        Some(real) => unsafe { real(fd, forward_mode(mode)) },
        None => fail_unresolved(),
    }
}

#[no_mangle]
pub unsafe extern "C" fn fchmodat(
    dirfd: c_int,
    path: *const c_char,
    mode: mode_t,
    flags: c_int,
) -> c_int {
    match real_fchmodat() {
        Some(real) => unsafe { real(dirfd, path, forward_mode(mode), flags) },
        None => fail_unresolved(),
    }
}

#[no_mangle]
pub unsafe extern "C" fn lchmod(path: *const c_char, mode: mode_t) -> c_int {
    match real_lchmod() {
        Some(real) => unsafe { real(path, forward_mode(mode)) },
        None => fail_unresolved(),
    }
}
