/*!
 * Mode Module
 * Permission mode values and setuid/setgid sanitization
 */

pub mod octal;
pub mod sanitize;
pub mod types;

// Re-exports
pub use octal::parse_octal;
pub use sanitize::{sanitize, sanitize_bits, sanitize_value, SPECIAL_BITS, S_ISGID, S_ISUID};
pub use types::ModeArg;
