/*!
 * Surface Initialization
 * Process-wide permission-change surface, installed once
 */

use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

use super::{traits::PermissionSurface, LocalFS, SanitizingSurface};

static SURFACE: OnceLock<Arc<dyn PermissionSurface>> = OnceLock::new();

/// Install the surface every caller in the process will use
///
/// The first installation wins. A later call hands its surface back in
/// `Err` and leaves the installed one in place.
pub fn install(
    surface: Arc<dyn PermissionSurface>,
) -> Result<(), Arc<dyn PermissionSurface>> {
    let name = surface.name().to_string();
    SURFACE.set(surface)?;
    info!(surface = %name, "Permission surface installed");
    Ok(())
}

/// The process-wide surface
///
/// Installs the sanitized host surface on first use if nothing was
/// installed before.
pub fn surface() -> Arc<dyn PermissionSurface> {
    Arc::clone(SURFACE.get_or_init(|| {
        debug!("No permission surface installed, using sanitized local surface");
        let surface: Arc<dyn PermissionSurface> =
            Arc::new(SanitizingSurface::wrap_all(LocalFS::new()));
        surface
    }))
}

/// Whether a surface has been installed or lazily created
pub fn is_installed() -> bool {
    SURFACE.get().is_some()
}
