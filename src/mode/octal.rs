/*!
 * Octal Token Parsing
 * Prefix parsing of textual permission modes
 */

/// Parse a textual mode as base 8.
///
/// Leading whitespace and a `+` sign are accepted, then the longest run of
/// octal digits is read and anything after it is ignored, so `"0755"`,
/// `" 755"` and `"755 "` all yield `0o755`. Returns `None` when no digit
/// is found, for negative tokens, and when the value overflows `u32`.
#[must_use]
pub fn parse_octal(token: &str) -> Option<u32> {
    let token = token.trim_start();
    let digits = match token.as_bytes().first() {
        Some(b'+') => &token[1..],
        Some(b'-') => return None,
        _ => token,
    };

    let mut value: u32 = 0;
    let mut seen = 0usize;
    for byte in digits.bytes() {
        if !(b'0'..=b'7').contains(&byte) {
            break;
        }
        value = value.checked_mul(8)?.checked_add(u32::from(byte - b'0'))?;
        seen += 1;
    }

    (seen > 0).then_some(value)
}
