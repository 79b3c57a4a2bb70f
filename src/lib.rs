/*!
 * chmod-sanitize Library
 * Strips setuid/setgid from permission changes made inside nosuid sandboxes
 */

pub mod config;
pub mod core;
pub mod launcher;
pub mod mode;
pub mod monitoring;
pub mod preload;
pub mod vfs;

// Re-exports
pub use crate::config::ShimConfig;
pub use crate::core::{ShimError, ShimResult};
pub use crate::launcher::Launch;
pub use crate::mode::{parse_octal, sanitize, sanitize_bits, sanitize_value, ModeArg};
pub use crate::monitoring::init_tracing;
pub use crate::vfs::{
    EntryPoint, LocalFS, MemFS, PermissionSurface, PromisePermissions, SanitizingSurface,
    VfsError, VfsResult,
};
