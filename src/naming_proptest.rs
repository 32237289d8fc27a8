//! Property-based tests for name derivation.
//!
//! These tests use proptest to generate random prefixes and verify that
//! the length ceiling and character set hold for every name role.

#[cfg(test)]
mod proptest_tests {
    use crate::naming::{
        abap_service_marker, abap_service_name, format, role_name, NameRole,
        MAX_SERVICE_NAME_LENGTH,
    };
    use proptest::prelude::*;

    fn is_safe(name: &str) -> bool {
        name.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }

    proptest! {
        /// Property: no role name exceeds its role maximum
        #[test]
        fn role_names_respect_max_len(prefix in ".{0,200}") {
            for role in NameRole::ALL {
                let name = role_name(role, &prefix);
                prop_assert!(
                    name.chars().count() <= role.max_len(),
                    "{:?} produced '{}' ({} chars, max {})",
                    role,
                    name,
                    name.chars().count(),
                    role.max_len()
                );
            }
        }

        /// Property: role names only contain platform-safe characters
        #[test]
        fn role_names_are_sanitized(prefix in ".{1,80}") {
            for role in NameRole::ALL {
                let name = role_name(role, &prefix);
                prop_assert!(is_safe(&name), "{:?} produced unsafe '{}'", role, name);
            }
        }

        /// Property: the role suffix always survives truncation
        #[test]
        fn role_names_keep_suffix(prefix in "[a-z]{0,200}") {
            for role in NameRole::ALL {
                prop_assert!(role_name(role, &prefix).ends_with(role.suffix()));
            }
        }

        /// Property: short prefixes are kept whole
        #[test]
        fn short_prefixes_are_not_truncated(prefix in "[a-zA-Z0-9_-]{1,20}") {
            for role in NameRole::ALL {
                prop_assert!(role_name(role, &prefix).starts_with(&prefix));
            }
        }

        /// Property: format is idempotent on its own output
        #[test]
        fn format_is_idempotent(prefix in ".*") {
            let once = format("%s-srv-api", &prefix);
            let twice = format(&once, "");
            prop_assert_eq!(once, twice);
        }

        /// Property: ABAP service names fit the service ceiling and carry the marker
        #[test]
        fn abap_names_fit(prefix in ".{0,100}", service in ".{0,100}") {
            let name = abap_service_name(&prefix, &service);
            prop_assert!(name.chars().count() <= MAX_SERVICE_NAME_LENGTH);
            prop_assert!(name.starts_with(&abap_service_marker(&prefix)));
            prop_assert!(is_safe(&name));
        }
    }
}
