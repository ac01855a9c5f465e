use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Characters a generated site id is drawn from.
pub const ALPHABET: &[u8; 36] = b"1234567890abcdefghijklmnopqrstuvwxyz";

/// Length of a generated site id.
pub const ID_LEN: usize = 16;

const MAX_ID_LEN: usize = 128;

/// Generate a fresh random site id.
///
/// Each character is drawn uniformly from [`ALPHABET`] using the thread-local
/// CSPRNG. 36^16 possible values make collisions negligible.
pub fn generate() -> SiteId {
    let mut rng = rand::rng();
    let id: String = (0..ID_LEN)
        .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
        .collect();
    SiteId(id)
}

/// Whether `value` can be used as a single directory name.
///
/// Non-empty, at most 128 bytes, ASCII alphanumerics plus `-`, `_` and `.`,
/// and not starting with `.` (which also excludes `.` and `..`).
fn is_path_segment(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_ID_LEN
        && !value.starts_with('.')
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}

macro_rules! segment_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn parse(value: impl Into<String>) -> Result<Self> {
                let value = value.into();
                if is_path_segment(&value) {
                    Ok(Self(value))
                } else {
                    Err(Error::InvalidId { kind: $kind, value })
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<std::path::Path> for $name {
            fn as_ref(&self) -> &std::path::Path {
                std::path::Path::new(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = Error;

            fn try_from(value: String) -> Result<Self> {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

segment_id!(
    /// Identifier of the principal that owns sites.
    ///
    /// Supplied by the authentication layer; validated here because it
    /// becomes a directory name.
    OwnerId,
    "owner"
);

segment_id!(
    /// Identifier of a site, usually produced by [`generate`].
    SiteId,
    "site"
);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn generated_id_shape() {
        let id = generate();
        assert_eq!(id.as_str().len(), ID_LEN);
        assert!(id.as_str().bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn generated_ids_differ() {
        let ids: std::collections::HashSet<_> = (0..1000).map(|_| generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn accepts_safe_segments() {
        for value in ["abc123", "user_42", "a.b-c", "X"] {
            assert!(OwnerId::parse(value).is_ok(), "{value:?}");
        }
    }

    #[test]
    fn rejects_unsafe_segments() {
        let long = "a".repeat(129);
        for value in ["", ".", "..", ".hidden", "a/b", "a\\b", "a b", "ü", "a\0", long.as_str()] {
            assert!(
                matches!(SiteId::parse(value), Err(Error::InvalidId { kind: "site", .. })),
                "{value:?}"
            );
        }
    }

    #[test]
    fn serde_validates() {
        let id: SiteId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(id.as_str(), "abc");
        assert!(serde_json::from_str::<SiteId>("\"../x\"").is_err());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }

    proptest! {
        #[test]
        fn generated_ids_are_valid_segments(_seed in 0u8..32) {
            let id = generate();
            prop_assert!(SiteId::parse(id.as_str()).is_ok());
            prop_assert_eq!(id.as_str().len(), ID_LEN);
        }

        #[test]
        fn accepted_ids_never_contain_separators(value in "\\PC{0,40}") {
            if let Ok(id) = OwnerId::parse(value) {
                prop_assert!(!id.as_str().contains('/'));
                prop_assert!(!id.as_str().contains('\\'));
                prop_assert!(!id.as_str().starts_with('.'));
            }
        }
    }
}
