/*!
 * Mode Sanitizer
 * Clears setuid/setgid from permission modes before they reach the OS
 */

use serde_json::Value;
use tracing::debug;

use super::octal::parse_octal;
use super::types::ModeArg;

/// Set-user-ID bit
pub const S_ISUID: u32 = 0o4000;

/// Set-group-ID bit
pub const S_ISGID: u32 = 0o2000;

/// Bits that are never forwarded
pub const SPECIAL_BITS: u32 = S_ISUID | S_ISGID;

/// Clear setuid/setgid from a numeric mode
#[inline(always)]
#[must_use]
pub const fn sanitize_bits(mode: u32) -> u32 {
    mode & !SPECIAL_BITS
}

/// Sanitize a mode argument
///
/// Numeric modes keep their value minus the special bits. Text modes are
/// parsed as octal and come back as `ModeArg::Numeric`; text that does not
/// parse is returned as is and left for the underlying operation to judge.
#[must_use]
pub fn sanitize(mode: ModeArg) -> ModeArg {
    match mode {
        ModeArg::Numeric(bits) => ModeArg::Numeric(sanitize_bits(bits)),
        ModeArg::Text(token) => match parse_octal(&token) {
            Some(bits) => ModeArg::Numeric(sanitize_bits(bits)),
            None => {
                debug!(mode = %token, "mode is not an octal token, forwarding unchanged");
                ModeArg::Text(token)
            }
        },
    }
}

/// Sanitize an untyped mode value
///
/// Numbers lose the special bits and otherwise keep their 64-bit integer
/// value. Non-integral numbers are first converted with `as i64`, which
/// truncates toward zero, saturates at the `i64` bounds and maps NaN to 0.
/// Nothing is wrapped to 32 bits. Strings follow [`sanitize`], and every
/// other JSON value passes through untouched.
#[must_use]
pub fn sanitize_value(value: Value) -> Value {
    match value {
        Value::Number(ref n) => {
            if let Some(bits) = n.as_u64() {
                Value::from(bits & !u64::from(SPECIAL_BITS))
            } else if let Some(bits) = n.as_i64() {
                Value::from(bits & !i64::from(SPECIAL_BITS))
            } else {
                let truncated = n.as_f64().map_or(0, |f| f as i64);
                Value::from(truncated & !i64::from(SPECIAL_BITS))
            }
        }
        Value::String(token) => match sanitize(ModeArg::Text(token)) {
            ModeArg::Numeric(bits) => Value::from(bits),
            ModeArg::Text(token) => Value::String(token),
        },
        other => other,
    }
}
