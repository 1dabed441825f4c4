//! Property-based tests for the key validator.

use super::*;
use proptest::prelude::*;

const SAFE_ALPHABET: &str = "[A-Za-z0-9!_*'()-]";

/// Keys made only of safe characters, never ending with a period and never
/// containing "./".
fn arb_safe_key() -> impl Strategy<Value = String> {
    (
        proptest::collection::vec(SAFE_ALPHABET, 1..40),
        proptest::collection::vec(prop_oneof![Just(""), Just(".")], 1..40),
    )
        .prop_map(|(chars, dots)| {
            let mut key = String::new();
            for (i, c) in chars.iter().enumerate() {
                key.push_str(c);
                if let Some(dot) = dots.get(i) {
                    if i + 1 < chars.len() {
                        key.push_str(dot);
                    }
                }
            }
            key
        })
}

fn arb_control_char() -> impl Strategy<Value = char> {
    prop_oneof![
        (0u32..32).prop_map(|c| char::from_u32(c).unwrap()),
        Just('\u{7f}'),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn safe_keys_are_clean(key in arb_safe_key()) {
        let result = validate_key(&key);
        prop_assert!(result.is_valid);
        prop_assert!(result.issues.is_empty());
        prop_assert!(result.recommendations.is_empty());
    }

    #[test]
    fn control_characters_invalidate(
        prefix in "[a-z]{0,10}",
        control in arb_control_char(),
        suffix in "[a-z]{1,10}",
    ) {
        let key = format!("{prefix}{control}{suffix}");
        let result = validate_key(&key);
        prop_assert!(!result.is_valid);
        prop_assert!(
            result
                .issues
                .iter()
                .any(|issue| issue.starts_with("contains non-printable characters"))
        );
    }

    #[test]
    fn over_long_keys_are_invalid(key in "\\PC{1025,1100}") {
        prop_assume!(key.len() > MAX_KEY_BYTES);
        let result = validate_key(&key);
        prop_assert!(!result.is_valid);
    }

    #[test]
    fn validity_matches_issues(key in "\\PC{0,64}") {
        let result = validate_key(&key);
        prop_assert_eq!(result.is_valid, result.issues.is_empty());
    }

    #[test]
    fn classification_is_total(c in any::<char>()) {
        // Every character lands in exactly one class; disqualifying classes
        // are exactly the two issue-producing ones.
        let class = classify(c);
        let code_point = c as u32;
        if code_point < 32 || code_point == 127 {
            prop_assert_eq!(class, CharClass::NonPrintable);
        }
        if class == CharClass::Extended {
            prop_assert!((128..=255).contains(&code_point));
        }
    }
}
