/*!
 * Recording Surface
 * Stub permission surface that records what reaches it
 */

use chmod_sanitize::vfs::traits::{Completion, PermissionSurface, PromisePermissions};
use chmod_sanitize::vfs::types::{EntryPoint, Operation, VfsError, VfsResult};
use chmod_sanitize::ModeArg;
use futures::future::{self, BoxFuture};
use std::os::unix::io::RawFd;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// What a call targeted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Path(PathBuf),
    Fd(RawFd),
}

/// One call as the stub saw it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub entry: EntryPoint,
    pub target: Target,
    pub mode: ModeArg,
}

#[derive(Clone, Default)]
pub struct RecordingSurface {
    calls: Arc<Mutex<Vec<Call>>>,
    fail_with: Option<VfsError>,
    lchmod: bool,
    promises: bool,
}

impl RecordingSurface {
    /// chmod and fchmod in all flavors, no lchmod, no promise grouping
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lchmod(mut self) -> Self {
        self.lchmod = true;
        self
    }

    pub fn with_promises(mut self) -> Self {
        self.promises = true;
        self
    }

    /// Every call fails with `error`
    pub fn failing(mut self, error: VfsError) -> Self {
        self.fail_with = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_mode(&self) -> Option<ModeArg> {
        self.calls().last().map(|call| call.mode.clone())
    }

    fn record(&self, entry: EntryPoint, target: Target, mode: ModeArg) -> VfsResult<()> {
        self.calls.lock().unwrap().push(Call {
            entry,
            target,
            mode,
        });
        match &self.fail_with {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

fn path(p: &Path) -> Target {
    Target::Path(p.to_path_buf())
}

impl PermissionSurface for RecordingSurface {
    fn chmod(&self, p: &Path, mode: ModeArg, done: Completion) {
        done(self.record(EntryPoint::Chmod, path(p), mode))
    }

    fn chmod_sync(&self, p: &Path, mode: ModeArg) -> VfsResult<()> {
        self.record(EntryPoint::ChmodSync, path(p), mode)
    }

    fn fchmod(&self, fd: RawFd, mode: ModeArg, done: Completion) {
        done(self.record(EntryPoint::Fchmod, Target::Fd(fd), mode))
    }

    fn fchmod_sync(&self, fd: RawFd, mode: ModeArg) -> VfsResult<()> {
        self.record(EntryPoint::FchmodSync, Target::Fd(fd), mode)
    }

    fn lchmod(&self, p: &Path, mode: ModeArg, done: Completion) {
        done(self.record(EntryPoint::Lchmod, path(p), mode))
    }

    fn lchmod_sync(&self, p: &Path, mode: ModeArg) -> VfsResult<()> {
        self.record(EntryPoint::LchmodSync, path(p), mode)
    }

    fn promises(&self) -> Option<&dyn PromisePermissions> {
        if self.promises {
            Some(self)
        } else {
            None
        }
    }

    fn provides(&self, entry: EntryPoint) -> bool {
        let present = entry.operation() != Operation::Lchmod || self.lchmod;
        match entry.flavor() {
            chmod_sanitize::vfs::Flavor::Promise => self.promises && present,
            _ => present,
        }
    }

    fn name(&self) -> &str {
        "recording"
    }
}

impl PromisePermissions for RecordingSurface {
    fn chmod(&self, p: &Path, mode: ModeArg) -> BoxFuture<'static, VfsResult<()>> {
        Box::pin(future::ready(self.record(EntryPoint::PromisesChmod, path(p), mode)))
    }

    fn fchmod(&self, fd: RawFd, mode: ModeArg) -> BoxFuture<'static, VfsResult<()>> {
        Box::pin(future::ready(self.record(
            EntryPoint::PromisesFchmod,
            Target::Fd(fd),
            mode,
        )))
    }

    fn lchmod(&self, p: &Path, mode: ModeArg) -> BoxFuture<'static, VfsResult<()>> {
        Box::pin(future::ready(self.record(EntryPoint::PromisesLchmod, path(p), mode)))
    }

    fn provides(&self, operation: Operation) -> bool {
        operation != Operation::Lchmod || self.lchmod
    }
}
