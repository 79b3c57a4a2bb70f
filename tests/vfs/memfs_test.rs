/*!
 * MemFS Tests
 * In-memory surface behind the sanitizing decorator
 */

use std::path::Path;

use chmod_sanitize::vfs::memory::MemFS;
use chmod_sanitize::vfs::traits::PermissionSurface;
use chmod_sanitize::vfs::types::{Permissions, VfsError};
use chmod_sanitize::{ModeArg, SanitizingSurface};

fn setup() -> (MemFS, SanitizingSurface<MemFS>) {
    let fs = MemFS::new();
    fs.create_file("/pkg/bin/helper", Permissions::readwrite())
        .unwrap();
    let surface = SanitizingSurface::wrap_all(fs.clone());
    (fs, surface)
}

#[test]
fn test_setuid_setgid_stripped_end_to_end() {
    let (fs, surface) = setup();

    surface
        .chmod_sync(Path::new("/pkg/bin/helper"), ModeArg::Numeric(0o6755))
        .unwrap();
    let perms = fs.permissions("/pkg/bin/helper").unwrap();
    assert_eq!(perms.mode, 0o755);
    assert!(!perms.is_setuid());
    assert!(!perms.is_setgid());
}

#[test]
fn test_text_mode_end_to_end() {
    let (fs, surface) = setup();

    surface
        .chmod_sync(Path::new("/pkg/bin/helper"), ModeArg::from("2755"))
        .unwrap();
    assert_eq!(fs.permissions("/pkg/bin/helper").unwrap().mode, 0o755);
}

#[test]
fn test_garbage_text_mode_rejected_by_backend() {
    let (fs, surface) = setup();

    assert!(matches!(
        surface.chmod_sync(Path::new("/pkg/bin/helper"), ModeArg::from("rwx")),
        Err(VfsError::InvalidArgument(_))
    ));
    assert_eq!(fs.permissions("/pkg/bin/helper").unwrap().mode, 0o644);
}

#[test]
fn test_fchmod_on_open_descriptor() {
    let (fs, surface) = setup();
    let fd = fs.open("/pkg/bin/helper").unwrap();

    surface.fchmod_sync(fd, ModeArg::Numeric(0o4711)).unwrap();
    assert_eq!(fs.permissions("/pkg/bin/helper").unwrap().mode, 0o711);

    fs.close(fd).unwrap();
    assert_eq!(
        surface.fchmod_sync(fd, ModeArg::Numeric(0o755)),
        Err(VfsError::BadDescriptor(fd))
    );
}

#[test]
fn test_lchmod_changes_link_not_target() {
    let (fs, surface) = setup();
    fs.symlink("/pkg/bin/helper", "/usr/bin/helper").unwrap();

    surface
        .lchmod_sync(Path::new("/usr/bin/helper"), ModeArg::Numeric(0o4700))
        .unwrap();
    assert_eq!(fs.symlink_permissions("/usr/bin/helper").unwrap().mode, 0o700);
    assert_eq!(fs.permissions("/pkg/bin/helper").unwrap().mode, 0o644);

    // chmod follows the link
    surface
        .chmod_sync(Path::new("/usr/bin/helper"), ModeArg::Numeric(0o2750))
        .unwrap();
    assert_eq!(fs.permissions("/pkg/bin/helper").unwrap().mode, 0o750);
}

#[test]
fn test_missing_path_error_surfaces() {
    let (_fs, surface) = setup();
    assert_eq!(
        surface.chmod_sync(Path::new("/nope"), ModeArg::Numeric(0o4755)),
        Err(VfsError::NotFound("/nope".into()))
    );
}

#[tokio::test]
async fn test_promises_end_to_end() {
    let (fs, surface) = setup();
    let promises = surface.promises().expect("memfs has a promise grouping");

    promises
        .chmod(Path::new("/pkg/bin/helper"), ModeArg::from("6775"))
        .await
        .unwrap();
    assert_eq!(fs.permissions("/pkg/bin/helper").unwrap().mode, 0o775);

    let fd = fs.open("/pkg/bin/helper").unwrap();
    promises.fchmod(fd, ModeArg::Numeric(0o4750)).await.unwrap();
    assert_eq!(fs.permissions("/pkg/bin/helper").unwrap().mode, 0o750);
}

#[test]
fn test_callback_flavor_completes() {
    let (fs, surface) = setup();
    let (tx, rx) = std::sync::mpsc::channel();

    PermissionSurface::chmod(
        &surface,
        Path::new("/pkg/bin/helper"),
        ModeArg::Numeric(0o4755),
        Box::new(move |result| tx.send(result).unwrap()),
    );
    assert_eq!(rx.recv().unwrap(), Ok(()));
    assert_eq!(fs.permissions("/pkg/bin/helper").unwrap().mode, 0o755);
}
