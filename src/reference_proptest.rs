//! Property-based tests for repository reference functions.
//!
//! These tests use proptest to generate random identifiers and verify that
//! the normalization invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::reference::{is_url, normalize, owner, qualify, short_name, Protocol};
    use proptest::prelude::*;

    fn segment() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9][a-zA-Z0-9_-]{0,20}"
    }

    fn url_identifier() -> impl Strategy<Value = String> {
        (segment(), segment(), segment()).prop_flat_map(|(host, owner, name)| {
            prop_oneof![
                Just(format!("https://{}.com/{}/{}.git", host, owner, name)),
                Just(format!("http://{}.org/{}/{}", host, owner, name)),
                Just(format!("ssh://git@{}.com/{}/{}.git", host, owner, name)),
                Just(format!("git@{}.com:{}/{}.git", host, owner, name)),
            ]
        })
    }

    // ============================================================================
    // normalize property tests
    // ============================================================================

    proptest! {
        /// Property: URL-shaped identifiers pass through normalize unchanged
        #[test]
        fn normalize_is_identity_for_urls(url in url_identifier(), prefer_ssh in any::<bool>()) {
            prop_assert!(is_url(&url));
            let normalized = normalize(&url, Protocol::from_prefer_ssh(prefer_ssh)).unwrap();
            prop_assert_eq!(normalized, url);
        }

        /// Property: both protocols agree on everything after the host prefix
        #[test]
        fn normalize_protocols_differ_only_in_prefix(owner in segment(), name in segment()) {
            let id = format!("{}/{}", owner, name);
            let https = normalize(&id, Protocol::Https).unwrap();
            let ssh = normalize(&id, Protocol::Ssh).unwrap();
            let tail = format!("{}/{}.git", owner, name);

            prop_assert!(https.ends_with(&tail));
            prop_assert!(ssh.ends_with(&tail));
            prop_assert_eq!(&https[..https.len() - tail.len()], "https://github.com/");
            prop_assert_eq!(&ssh[..ssh.len() - tail.len()], "git@github.com:");
        }

        /// Property: normalize is deterministic
        #[test]
        fn normalize_is_deterministic(owner in segment(), name in segment(), prefer_ssh in any::<bool>()) {
            let id = format!("{}/{}", owner, name);
            let protocol = Protocol::from_prefer_ssh(prefer_ssh);
            prop_assert_eq!(normalize(&id, protocol).unwrap(), normalize(&id, protocol).unwrap());
        }
    }

    // ============================================================================
    // short_name / owner / qualify property tests
    // ============================================================================

    proptest! {
        /// Property: short_name is idempotent on bare names
        #[test]
        fn short_name_is_idempotent(name in segment()) {
            let once = short_name(&name);
            prop_assert_eq!(short_name(&once), once.clone());
            prop_assert_eq!(once, name);
        }

        /// Property: the short name of a normalized URL is the repository name
        #[test]
        fn short_name_of_normalized_url(owner in segment(), name in segment(), prefer_ssh in any::<bool>()) {
            let url = normalize(&format!("{}/{}", owner, name), Protocol::from_prefer_ssh(prefer_ssh)).unwrap();
            prop_assert_eq!(short_name(&url), name);
        }

        /// Property: the owner survives normalization
        #[test]
        fn owner_is_stable_across_normalization(owner_name in segment(), name in segment(), prefer_ssh in any::<bool>()) {
            let id = format!("{}/{}", owner_name, name);
            let url = normalize(&id, Protocol::from_prefer_ssh(prefer_ssh)).unwrap();
            prop_assert_eq!(owner(&id), Some(owner_name.clone()));
            prop_assert_eq!(owner(&url), Some(owner_name));
        }

        /// Property: qualify never rewrites an already-qualified identifier
        #[test]
        fn qualify_keeps_qualified(owner_name in segment(), other in segment(), name in segment()) {
            let qualified = format!("{}/{}", other, name);
            prop_assert_eq!(qualify(&qualified, &owner_name), qualified.clone());
            prop_assert_eq!(qualify(&name, &owner_name), format!("{}/{}", owner_name, name));
        }
    }
}
