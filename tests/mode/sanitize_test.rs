/*!
 * Sanitizer Property Tests
 * setuid/setgid never survive, everything else does
 */

use chmod_sanitize::mode::{parse_octal, sanitize, sanitize_value, ModeArg, SPECIAL_BITS};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};

proptest! {
    #[test]
    fn numeric_modes_lose_only_special_bits(m in any::<u32>()) {
        prop_assert_eq!(sanitize(ModeArg::Numeric(m)), ModeArg::Numeric(m & !(0o4000 | 0o2000)));
    }

    #[test]
    fn octal_tokens_become_sanitized_numbers(
        zero in any::<bool>(),
        bits in 0u32..=0o7777,
    ) {
        let token = if zero { format!("0{:o}", bits) } else { format!("{:o}", bits) };
        let expected = parse_octal(&token).unwrap() & !SPECIAL_BITS;
        let result = sanitize(ModeArg::Text(token));
        prop_assert!(result.is_numeric());
        prop_assert_eq!(result, ModeArg::Numeric(expected));
    }

    #[test]
    fn non_octal_text_is_untouched(token in "[a-zA-Z89 _-]*[a-zA-Z89_-]") {
        // No octal digit can start the token once whitespace is skipped
        prop_assume!(parse_octal(&token).is_none());
        prop_assert_eq!(sanitize(ModeArg::Text(token.clone())), ModeArg::Text(token));
    }

    #[test]
    fn sanitize_is_idempotent_for_numbers(m in any::<u32>()) {
        let once = sanitize(ModeArg::Numeric(m));
        prop_assert_eq!(sanitize(once.clone()), once);
    }

    #[test]
    fn sanitize_is_idempotent_for_text(token in ".{0,12}") {
        let once = sanitize(ModeArg::Text(token));
        prop_assert_eq!(sanitize(once.clone()), once);
    }

    #[test]
    fn sanitize_value_is_idempotent_for_numbers(n in any::<i64>()) {
        let once = sanitize_value(json!(n));
        prop_assert_eq!(sanitize_value(once.clone()), once);
    }

    #[test]
    fn sanitized_numbers_never_carry_special_bits(m in any::<u32>()) {
        match sanitize(ModeArg::Numeric(m)) {
            ModeArg::Numeric(bits) => prop_assert_eq!(bits & SPECIAL_BITS, 0),
            ModeArg::Text(_) => prop_assert!(false, "numeric stays numeric"),
        }
    }
}

#[test]
fn test_known_tokens() {
    assert_eq!(sanitize("755".into()), ModeArg::Numeric(0o755));
    assert_eq!(sanitize("0755".into()), ModeArg::Numeric(0o755));
    assert_eq!(sanitize("4755".into()), ModeArg::Numeric(0o755));
    assert_eq!(sanitize("2755".into()), ModeArg::Numeric(0o755));
    assert_eq!(sanitize("abc".into()), ModeArg::Text("abc".into()));
}

#[test]
fn test_non_mode_values_pass_through() {
    let values = [
        Value::Null,
        json!(true),
        json!(false),
        json!({"mode": "4755"}),
        json!([0o4755]),
    ];
    for value in values {
        assert_eq!(sanitize_value(value.clone()), value.clone());
        // Idempotent as well
        assert_eq!(sanitize_value(sanitize_value(value.clone())), value);
    }
}

#[test]
fn test_value_strings() {
    assert_eq!(sanitize_value(json!("6755")), json!(0o755));
    assert_eq!(sanitize_value(json!("0644")), json!(0o644));
    assert_eq!(sanitize_value(json!("not-a-mode")), json!("not-a-mode"));
}
