/*!
 * Local Surface Backend
 * Host permission-change calls through nix
 */

use futures::future::BoxFuture;
use nix::libc::mode_t;
use nix::sys::stat::{fchmod, fchmodat, FchmodatFlags, Mode};
use std::os::unix::io::RawFd;
use std::path::{Path, PathBuf};

use super::traits::{Completion, PermissionSurface, PromisePermissions};
use super::types::*;
use crate::mode::ModeArg;

/// Whether the host can change the mode of a symlink itself
const LCHMOD_AVAILABLE: bool = cfg!(not(any(target_os = "linux", target_os = "android")));

/// Host filesystem implementation
///
/// Blocking entry points call straight into the OS. Callback entry points run
/// on the Tokio blocking pool when a runtime is current and inline otherwise.
/// Promise futures must be polled on a Tokio runtime.
#[derive(Debug, Clone, Default)]
pub struct LocalFS {
    _private: (),
}

impl LocalFS {
    pub fn new() -> Self {
        Self::default()
    }

    fn to_mode(mode: &ModeArg) -> VfsResult<Mode> {
        let perms = Permissions::from_arg(mode)?;
        Ok(Mode::from_bits_truncate(perms.mode as mode_t))
    }

    fn chmod_path(path: &Path, mode: &ModeArg, follow: bool) -> VfsResult<()> {
        let (op, flag) = if follow {
            ("chmod", FchmodatFlags::FollowSymlink)
        } else {
            ("lchmod", FchmodatFlags::NoFollowSymlink)
        };
        let mode = Self::to_mode(mode)?;
        fchmodat(None, path, mode, flag)
            .map_err(|errno| VfsError::from_errno(errno, format!("{} {}", op, path.display())))
    }

    fn chmod_fd(fd: RawFd, mode: &ModeArg) -> VfsResult<()> {
        let mode = Self::to_mode(mode)?;
        fchmod(fd, mode).map_err(|errno| match errno {
            nix::errno::Errno::EBADF => VfsError::BadDescriptor(fd),
            errno => VfsError::from_errno(errno, format!("fchmod {}", fd)),
        })
    }

    fn lchmod_path(path: &Path, mode: &ModeArg) -> VfsResult<()> {
        if !LCHMOD_AVAILABLE {
            return Err(VfsError::NotSupported(format!("lchmod {}", path.display())));
        }
        Self::chmod_path(path, mode, false)
    }

    /// Run a blocking operation and report it through `done`
    fn dispatch<O>(op: O, done: Completion)
    where
        O: FnOnce() -> VfsResult<()> + Send + 'static,
    {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || done(op()));
            }
            Err(_) => done(op()),
        }
    }

    /// Run a blocking operation on the Tokio blocking pool
    fn offload<O>(op: O) -> BoxFuture<'static, VfsResult<()>>
    where
        O: FnOnce() -> VfsResult<()> + Send + 'static,
    {
        Box::pin(async move {
            tokio::task::spawn_blocking(op)
                .await
                .map_err(|e| VfsError::IoError(format!("blocking task failed: {}", e)))?
        })
    }
}

impl PermissionSurface for LocalFS {
    fn chmod(&self, path: &Path, mode: ModeArg, done: Completion) {
        let path = path.to_path_buf();
        Self::dispatch(move || Self::chmod_path(&path, &mode, true), done)
    }

    fn chmod_sync(&self, path: &Path, mode: ModeArg) -> VfsResult<()> {
        Self::chmod_path(path, &mode, true)
    }

    fn fchmod(&self, fd: RawFd, mode: ModeArg, done: Completion) {
        Self::dispatch(move || Self::chmod_fd(fd, &mode), done)
    }

    fn fchmod_sync(&self, fd: RawFd, mode: ModeArg) -> VfsResult<()> {
        Self::chmod_fd(fd, &mode)
    }

    fn lchmod(&self, path: &Path, mode: ModeArg, done: Completion) {
        let path = path.to_path_buf();
        Self::dispatch(move || Self::lchmod_path(&path, &mode), done)
    }

    fn lchmod_sync(&self, path: &Path, mode: ModeArg) -> VfsResult<()> {
        Self::lchmod_path(path, &mode)
    }

    fn promises(&self) -> Option<&dyn PromisePermissions> {
        Some(self)
    }

    fn provides(&self, entry: EntryPoint) -> bool {
        entry.operation() != Operation::Lchmod || LCHMOD_AVAILABLE
    }

    fn name(&self) -> &str {
        "local"
    }
}

impl PromisePermissions for LocalFS {
    fn chmod(&self, path: &Path, mode: ModeArg) -> BoxFuture<'static, VfsResult<()>> {
        let path: PathBuf = path.to_path_buf();
        Self::offload(move || Self::chmod_path(&path, &mode, true))
    }

    fn fchmod(&self, fd: RawFd, mode: ModeArg) -> BoxFuture<'static, VfsResult<()>> {
        Self::offload(move || Self::chmod_fd(fd, &mode))
    }

    fn lchmod(&self, path: &Path, mode: ModeArg) -> BoxFuture<'static, VfsResult<()>> {
        let path: PathBuf = path.to_path_buf();
        Self::offload(move || Self::lchmod_path(&path, &mode))
    }

    fn provides(&self, operation: Operation) -> bool {
        operation != Operation::Lchmod || LCHMOD_AVAILABLE
    }
}
