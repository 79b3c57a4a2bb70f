/*!
 * VFS Traits
 * The injectable permission-change surface
 */

use futures::future::{self, BoxFuture};
use std::os::unix::io::RawFd;
use std::path::Path;

use super::types::*;
use crate::mode::ModeArg;

/// Completion handed to the callback flavor of an entry point
pub type Completion = Box<dyn FnOnce(VfsResult<()>) + Send + 'static>;

/// Permission-change surface
///
/// Everything in the process that changes file modes goes through an
/// implementation of this trait. The mode is always the second positional
/// parameter. Callback methods report through `done`, `*_sync` methods block
/// and return the result.
///
/// The lchmod family is optional: implementations that cannot change the
/// mode of a symlink itself leave the defaults in place and report the
/// entry points as absent through [`PermissionSurface::provides`].
pub trait PermissionSurface: Send + Sync {
    /// Change the mode of a path, following symlinks
    fn chmod(&self, path: &Path, mode: ModeArg, done: Completion);

    /// Blocking form of [`PermissionSurface::chmod`]
    fn chmod_sync(&self, path: &Path, mode: ModeArg) -> VfsResult<()>;

    /// Change the mode of an open file descriptor
    fn fchmod(&self, fd: RawFd, mode: ModeArg, done: Completion);

    /// Blocking form of [`PermissionSurface::fchmod`]
    fn fchmod_sync(&self, fd: RawFd, mode: ModeArg) -> VfsResult<()>;

    /// Change the mode of a path without following symlinks
    fn lchmod(&self, path: &Path, _mode: ModeArg, done: Completion) {
        done(Err(lchmod_unsupported(path)))
    }

    /// Blocking form of [`PermissionSurface::lchmod`]
    fn lchmod_sync(&self, path: &Path, _mode: ModeArg) -> VfsResult<()> {
        Err(lchmod_unsupported(path))
    }

    /// Promise grouping, when this surface has one
    fn promises(&self) -> Option<&dyn PromisePermissions> {
        None
    }

    /// Whether the named entry point exists on this surface
    fn provides(&self, entry: EntryPoint) -> bool {
        match entry.flavor() {
            Flavor::Promise => self
                .promises()
                .map_or(false, |promises| promises.provides(entry.operation())),
            _ => entry.operation() != Operation::Lchmod,
        }
    }

    /// Get surface name/type
    fn name(&self) -> &str;
}

/// Future-returning grouping of the permission-change calls
pub trait PromisePermissions: Send + Sync {
    /// Change the mode of a path, following symlinks
    fn chmod(&self, path: &Path, mode: ModeArg) -> BoxFuture<'static, VfsResult<()>>;

    /// Change the mode of an open file descriptor
    fn fchmod(&self, fd: RawFd, mode: ModeArg) -> BoxFuture<'static, VfsResult<()>>;

    /// Change the mode of a path without following symlinks
    fn lchmod(&self, path: &Path, _mode: ModeArg) -> BoxFuture<'static, VfsResult<()>> {
        Box::pin(future::ready(Err(lchmod_unsupported(path))))
    }

    /// Whether the grouping exposes the operation
    fn provides(&self, operation: Operation) -> bool {
        operation != Operation::Lchmod
    }
}

fn lchmod_unsupported(path: &Path) -> VfsError {
    VfsError::NotSupported(format!("lchmod {}", path.display()))
}
