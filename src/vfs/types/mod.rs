/*!
 * VFS Types
 * Shared types for permission-change operations
 */

mod entry_point;
mod errors;
mod permissions;

pub use entry_point::{EntryPoint, EntrySet, Flavor, Operation};
pub use errors::{VfsError, VfsResult};
pub use permissions::Permissions;
