//! Property-based tests for color validation

use proptest::prelude::*;
use tenant_branding::shared::color::{color_or_default, is_hex_color, parse_hex_color};

proptest! {
    #[test]
    fn test_six_digit_hex_is_accepted(value in "#[0-9a-fA-F]{6}") {
        prop_assert!(is_hex_color(&value));
        let parsed = parse_hex_color("bg_color", &value).unwrap();
        prop_assert_eq!(parsed, value.to_ascii_lowercase());
    }

    #[test]
    fn test_strings_without_hash_are_rejected(value in "[0-9a-zA-Z ]{0,12}") {
        prop_assert!(!is_hex_color(&value));
        prop_assert!(parse_hex_color("bg_color", &value).is_err());
    }

    #[test]
    fn test_fallback_is_always_a_color(value in ".{0,10}") {
        let color = color_or_default(Some(&value), "#ffffff");
        prop_assert!(is_hex_color(&color));
    }
}
