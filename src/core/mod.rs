/*!
 * Core Module
 * Error handling shared across the shim
 */

pub mod errors;

// Re-export for convenience
pub use errors::*;
