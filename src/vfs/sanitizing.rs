/*!
 * Sanitizing Wrapper - Strip setuid/setgid from any PermissionSurface
 * Decorator pattern so every backend gets the same treatment without modification
 */

use futures::future::{self, BoxFuture};
use std::os::unix::io::RawFd;
use std::path::Path;
use std::sync::Arc;
use tracing::trace;

use super::traits::{Completion, PermissionSurface, PromisePermissions};
use super::types::*;
use crate::mode::{sanitize, ModeArg};

/// Wrapper that sanitizes the mode argument of selected entry points
///
/// Only entry points marked through [`SanitizingSurface::wrap`] rewrite the
/// mode; the rest forward it untouched. Paths, descriptors, completions and
/// results always pass through as they are.
pub struct SanitizingSurface<F: PermissionSurface> {
    /// Inner surface implementation
    inner: Arc<F>,

    /// Entry points whose mode is sanitized
    wrapped: EntrySet,
}

impl<F: PermissionSurface> SanitizingSurface<F> {
    /// Decorate a surface without wrapping any entry point yet
    pub fn new(inner: F) -> Self {
        Self::from_arc(Arc::new(inner))
    }

    /// Decorate an Arc'd surface
    pub fn from_arc(inner: Arc<F>) -> Self {
        Self {
            inner,
            wrapped: EntrySet::empty(),
        }
    }

    /// Decorate a surface and wrap every entry point it provides
    ///
    /// The promise grouping is covered only if the surface has one now.
    pub fn wrap_all(inner: F) -> Self {
        let mut surface = Self::new(inner);
        for entry in EntryPoint::DIRECT {
            surface.wrap(entry);
        }
        if surface.inner.promises().is_some() {
            for entry in EntryPoint::PROMISES {
                surface.wrap(entry);
            }
        }
        surface
    }

    /// Start sanitizing one entry point
    ///
    /// Returns `false` and leaves the surface as it was when the inner
    /// surface does not provide the entry point.
    pub fn wrap(&mut self, entry: EntryPoint) -> bool {
        if !self.inner.provides(entry) {
            trace!(entry = %entry, surface = self.inner.name(), "entry point absent, not wrapped");
            return false;
        }
        self.wrapped.insert(entry);
        true
    }

    /// Start sanitizing an entry point given by name; unknown names are ignored
    pub fn wrap_named(&mut self, name: &str) -> bool {
        match name.parse::<EntryPoint>() {
            Ok(entry) => self.wrap(entry),
            Err(_) => false,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_wrapped(&self, entry: EntryPoint) -> bool {
        self.wrapped.contains(entry)
    }

    #[inline]
    #[must_use]
    pub fn wrapped(&self) -> EntrySet {
        self.wrapped
    }

    /// Get reference to inner surface
    pub fn inner(&self) -> &F {
        &self.inner
    }

    #[inline]
    fn forward(&self, entry: EntryPoint, mode: ModeArg) -> ModeArg {
        if self.wrapped.contains(entry) {
            sanitize(mode)
        } else {
            mode
        }
    }
}

impl<F: PermissionSurface> PermissionSurface for SanitizingSurface<F> {
    fn chmod(&self, path: &Path, mode: ModeArg, done: Completion) {
        self.inner
            .chmod(path, self.forward(EntryPoint::Chmod, mode), done)
    }

    fn chmod_sync(&self, path: &Path, mode: ModeArg) -> VfsResult<()> {
        self.inner
            .chmod_sync(path, self.forward(EntryPoint::ChmodSync, mode))
    }

    fn fchmod(&self, fd: RawFd, mode: ModeArg, done: Completion) {
        self.inner
            .fchmod(fd, self.forward(EntryPoint::Fchmod, mode), done)
    }

    fn fchmod_sync(&self, fd: RawFd, mode: ModeArg) -> VfsResult<()> {
        self.inner
            .fchmod_sync(fd, self.forward(EntryPoint::FchmodSync, mode))
    }

    fn lchmod(&self, path: &Path, mode: ModeArg, done: Completion) {
        self.inner
            .lchmod(path, self.forward(EntryPoint::Lchmod, mode), done)
    }

    fn lchmod_sync(&self, path: &Path, mode: ModeArg) -> VfsResult<()> {
        self.inner
            .lchmod_sync(path, self.forward(EntryPoint::LchmodSync, mode))
    }

    fn promises(&self) -> Option<&dyn PromisePermissions> {
        self.inner
            .promises()
            .map(|_| self as &dyn PromisePermissions)
    }

    fn provides(&self, entry: EntryPoint) -> bool {
        self.inner.provides(entry)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

impl<F: PermissionSurface> PromisePermissions for SanitizingSurface<F> {
    fn chmod(&self, path: &Path, mode: ModeArg) -> BoxFuture<'static, VfsResult<()>> {
        let mode = self.forward(EntryPoint::PromisesChmod, mode);
        match self.inner.promises() {
            Some(promises) => promises.chmod(path, mode),
            None => no_promises(),
        }
    }

    fn fchmod(&self, fd: RawFd, mode: ModeArg) -> BoxFuture<'static, VfsResult<()>> {
        let mode = self.forward(EntryPoint::PromisesFchmod, mode);
        match self.inner.promises() {
            Some(promises) => promises.fchmod(fd, mode),
            None => no_promises(),
        }
    }

    fn lchmod(&self, path: &Path, mode: ModeArg) -> BoxFuture<'static, VfsResult<()>> {
        let mode = self.forward(EntryPoint::PromisesLchmod, mode);
        match self.inner.promises() {
            Some(promises) => promises.lchmod(path, mode),
            None => no_promises(),
        }
    }

    fn provides(&self, operation: Operation) -> bool {
        self.inner
            .promises()
            .map_or(false, |promises| promises.provides(operation))
    }
}

impl<F: PermissionSurface> Clone for SanitizingSurface<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            wrapped: self.wrapped,
        }
    }
}

fn no_promises() -> BoxFuture<'static, VfsResult<()>> {
    Box::pin(future::ready(Err(VfsError::NotSupported(
        "surface has no promise grouping".into(),
    ))))
}
