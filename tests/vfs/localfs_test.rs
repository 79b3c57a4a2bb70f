/*!
 * LocalFS Tests
 * Host permission changes through the sanitizing decorator
 */

use std::fs::{self, File};
use std::os::unix::fs::PermissionsExt;
use std::os::unix::io::AsRawFd;
use std::path::Path;

use chmod_sanitize::vfs::local::LocalFS;
use chmod_sanitize::vfs::traits::PermissionSurface;
use chmod_sanitize::vfs::types::VfsError;
use chmod_sanitize::{ModeArg, SanitizingSurface};
use tempfile::TempDir;
use tokio::sync::oneshot;

fn mode_of(path: &Path) -> u32 {
    fs::metadata(path).unwrap().permissions().mode() & 0o7777
}

fn setup() -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fuse-helper");
    fs::write(&path, b"\x7fELF").unwrap();
    (dir, path)
}

#[test]
fn test_chmod_sync_strips_special_bits() {
    let (_dir, path) = setup();
    let surface = SanitizingSurface::wrap_all(LocalFS::new());

    surface.chmod_sync(&path, ModeArg::Numeric(0o6755)).unwrap();
    assert_eq!(mode_of(&path), 0o755);

    surface.chmod_sync(&path, ModeArg::from("4700")).unwrap();
    assert_eq!(mode_of(&path), 0o700);
}

#[test]
fn test_fchmod_sync_strips_special_bits() {
    let (_dir, path) = setup();
    let surface = SanitizingSurface::wrap_all(LocalFS::new());
    let file = File::open(&path).unwrap();

    surface
        .fchmod_sync(file.as_raw_fd(), ModeArg::from("2750"))
        .unwrap();
    assert_eq!(mode_of(&path), 0o750);
}

#[test]
fn test_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let surface = SanitizingSurface::wrap_all(LocalFS::new());

    assert!(matches!(
        surface.chmod_sync(&dir.path().join("absent"), ModeArg::Numeric(0o4755)),
        Err(VfsError::NotFound(_))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_callback_runs_on_blocking_pool() {
    let (_dir, path) = setup();
    let surface = SanitizingSurface::wrap_all(LocalFS::new());
    let (tx, rx) = oneshot::channel();

    PermissionSurface::chmod(
        &surface,
        &path,
        ModeArg::Numeric(0o4751),
        Box::new(move |result| {
            let _ = tx.send(result);
        }),
    );
    assert_eq!(rx.await.unwrap(), Ok(()));
    assert_eq!(mode_of(&path), 0o751);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_promise_chmod() {
    let (_dir, path) = setup();
    let surface = SanitizingSurface::wrap_all(LocalFS::new());
    let promises = surface.promises().expect("local surface has a promise grouping");

    promises
        .chmod(&path, ModeArg::from("06711"))
        .await
        .unwrap();
    assert_eq!(mode_of(&path), 0o711);

    let file = File::open(&path).unwrap();
    promises
        .fchmod(file.as_raw_fd(), ModeArg::Numeric(0o4640))
        .await
        .unwrap();
    assert_eq!(mode_of(&path), 0o640);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_promise_error_propagates() {
    let dir = tempfile::tempdir().unwrap();
    let surface = SanitizingSurface::wrap_all(LocalFS::new());
    let promises = surface.promises().unwrap();

    let result = promises
        .chmod(&dir.path().join("absent"), ModeArg::Numeric(0o755))
        .await;
    assert!(matches!(result, Err(VfsError::NotFound(_))));
}
