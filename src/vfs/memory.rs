/*!
 * In-Memory Surface Backend
 * Volatile files, symlinks and descriptors for tests and dry runs
 */

use dashmap::DashMap;
use futures::future::{self, BoxFuture};
use std::os::unix::io::RawFd;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use super::traits::{Completion, PermissionSurface, PromisePermissions};
use super::types::*;
use crate::mode::ModeArg;

/// Symlink hops before resolution gives up
const MAX_SYMLINK_HOPS: usize = 40;

/// First descriptor handed out, after stdio
const FIRST_FD: RawFd = 3;

/// In-memory filesystem node
#[derive(Debug, Clone)]
enum Node {
    File { permissions: Permissions },
    Symlink { target: PathBuf, permissions: Permissions },
}

impl Node {
    fn permissions(&self) -> Permissions {
        match self {
            Node::File { permissions } | Node::Symlink { permissions, .. } => *permissions,
        }
    }

    fn set_permissions(&mut self, perms: Permissions) {
        match self {
            Node::File { permissions } | Node::Symlink { permissions, .. } => *permissions = perms,
        }
    }
}

/// In-memory surface implementation
///
/// Provides every entry point, the lchmod family and the promise grouping
/// included. Completions run before the call returns.
#[derive(Debug, Clone)]
pub struct MemFS {
    nodes: Arc<DashMap<PathBuf, Node>>,
    fds: Arc<DashMap<RawFd, PathBuf>>,
    next_fd: Arc<AtomicI32>,
}

impl MemFS {
    /// Create new, empty in-memory filesystem
    pub fn new() -> Self {
        Self {
            nodes: Arc::new(DashMap::new()),
            fds: Arc::new(DashMap::new()),
            next_fd: Arc::new(AtomicI32::new(FIRST_FD)),
        }
    }

    /// Create (or replace) a regular file
    pub fn create_file(&self, path: impl AsRef<Path>, permissions: Permissions) -> VfsResult<()> {
        let path = Self::normalize(path.as_ref())?;
        self.nodes.insert(path, Node::File { permissions });
        Ok(())
    }

    /// Create a symlink at `link` pointing to `target`
    pub fn symlink(&self, target: impl AsRef<Path>, link: impl AsRef<Path>) -> VfsResult<()> {
        let link = Self::normalize(link.as_ref())?;
        let target = target.as_ref().to_path_buf();
        self.nodes.insert(
            link,
            Node::Symlink {
                target,
                permissions: Permissions::new(0o777),
            },
        );
        Ok(())
    }

    /// Open a path (following symlinks) and return its descriptor
    pub fn open(&self, path: impl AsRef<Path>) -> VfsResult<RawFd> {
        let resolved = self.resolve(path.as_ref())?;
        let fd = self.next_fd.fetch_add(1, Ordering::Relaxed);
        self.fds.insert(fd, resolved);
        Ok(fd)
    }

    /// Close a descriptor
    pub fn close(&self, fd: RawFd) -> VfsResult<()> {
        self.fds
            .remove(&fd)
            .map(|_| ())
            .ok_or(VfsError::BadDescriptor(fd))
    }

    /// Permissions of a path, following symlinks
    pub fn permissions(&self, path: impl AsRef<Path>) -> VfsResult<Permissions> {
        let resolved = self.resolve(path.as_ref())?;
        self.node_permissions(&resolved)
    }

    /// Permissions of a path itself, without following a final symlink
    pub fn symlink_permissions(&self, path: impl AsRef<Path>) -> VfsResult<Permissions> {
        let path = Self::normalize(path.as_ref())?;
        self.node_permissions(&path)
    }

    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        self.resolve(path.as_ref()).is_ok()
    }

    /// Normalize path (make absolute and clean)
    fn normalize(path: &Path) -> VfsResult<PathBuf> {
        let mut normalized = PathBuf::from("/");
        for comp in path.components() {
            match comp {
                Component::Normal(c) => normalized.push(c),
                Component::ParentDir => {
                    normalized.pop();
                }
                _ => {}
            }
        }
        if normalized.as_os_str() == "/" {
            return Err(VfsError::InvalidArgument(format!(
                "not a file path: {}",
                path.display()
            )));
        }
        Ok(normalized)
    }

    /// Follow symlinks until a regular file is reached
    fn resolve(&self, path: &Path) -> VfsResult<PathBuf> {
        let mut current = Self::normalize(path)?;
        for _ in 0..MAX_SYMLINK_HOPS {
            let next = match self.nodes.get(&current) {
                None => return Err(VfsError::NotFound(path.display().to_string())),
                Some(node) => match node.value() {
                    Node::File { .. } => return Ok(current),
                    Node::Symlink { target, .. } => {
                        let base = current.parent().unwrap_or_else(|| Path::new("/"));
                        Self::normalize(&base.join(target))?
                    }
                },
            };
            current = next;
        }
        Err(VfsError::IoError(format!(
            "too many levels of symbolic links: {}",
            path.display()
        )))
    }

    fn node_permissions(&self, path: &Path) -> VfsResult<Permissions> {
        self.nodes
            .get(path)
            .map(|node| node.permissions())
            .ok_or_else(|| VfsError::NotFound(path.display().to_string()))
    }

    fn apply(&self, path: &Path, mode: &ModeArg) -> VfsResult<()> {
        let permissions = Permissions::from_arg(mode)?;
        let mut node = self
            .nodes
            .get_mut(path)
            .ok_or_else(|| VfsError::NotFound(path.display().to_string()))?;
        node.set_permissions(permissions);
        Ok(())
    }

    fn fd_path(&self, fd: RawFd) -> VfsResult<PathBuf> {
        self.fds
            .get(&fd)
            .map(|entry| entry.value().clone())
            .ok_or(VfsError::BadDescriptor(fd))
    }
}

impl Default for MemFS {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionSurface for MemFS {
    fn chmod(&self, path: &Path, mode: ModeArg, done: Completion) {
        done(self.chmod_sync(path, mode))
    }

    fn chmod_sync(&self, path: &Path, mode: ModeArg) -> VfsResult<()> {
        let resolved = self.resolve(path)?;
        self.apply(&resolved, &mode)
    }

    fn fchmod(&self, fd: RawFd, mode: ModeArg, done: Completion) {
        done(self.fchmod_sync(fd, mode))
    }

    fn fchmod_sync(&self, fd: RawFd, mode: ModeArg) -> VfsResult<()> {
        let path = self.fd_path(fd)?;
        self.apply(&path, &mode)
    }

    fn lchmod(&self, path: &Path, mode: ModeArg, done: Completion) {
        done(self.lchmod_sync(path, mode))
    }

    fn lchmod_sync(&self, path: &Path, mode: ModeArg) -> VfsResult<()> {
        let path = Self::normalize(path)?;
        self.apply(&path, &mode)
    }

    fn promises(&self) -> Option<&dyn PromisePermissions> {
        Some(self)
    }

    fn provides(&self, _entry: EntryPoint) -> bool {
        true
    }

    fn name(&self) -> &str {
        "memfs"
    }
}

impl PromisePermissions for MemFS {
    fn chmod(&self, path: &Path, mode: ModeArg) -> BoxFuture<'static, VfsResult<()>> {
        Box::pin(future::ready(self.chmod_sync(path, mode)))
    }

    fn fchmod(&self, fd: RawFd, mode: ModeArg) -> BoxFuture<'static, VfsResult<()>> {
        Box::pin(future::ready(self.fchmod_sync(fd, mode)))
    }

    fn lchmod(&self, path: &Path, mode: ModeArg) -> BoxFuture<'static, VfsResult<()>> {
        Box::pin(future::ready(self.lchmod_sync(path, mode)))
    }

    fn provides(&self, _operation: Operation) -> bool {
        true
    }
}
