/*!
 * Virtual File System Module
 * Injectable permission-change surface and its sanitizing decorator
 */

pub mod init;
pub mod local;
pub mod memory;
pub mod sanitizing;
pub mod traits;
pub mod types;

// Re-exports
pub use init::{install, is_installed, surface};
pub use local::LocalFS;
pub use memory::MemFS;
pub use sanitizing::SanitizingSurface;
pub use traits::{Completion, PermissionSurface, PromisePermissions};
pub use types::{EntryPoint, EntrySet, Flavor, Operation, Permissions, VfsError, VfsResult};
