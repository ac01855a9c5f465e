use std::fmt;
use std::str::FromStr;

use crate::error::{FetchError, Result};

const MAX_REF_LEN: usize = 255;

/// A repository identifier of the form `<owner>/<name>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RepoSpec {
    owner: String,
    name: String,
}

impl RepoSpec {
    /// Parse `<owner>/<name>`.
    ///
    /// Exactly one `/`, both halves non-empty and made of ASCII
    /// alphanumerics, `-`, `_` and `.`. Neither half may be `.` or `..`.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || FetchError::InvalidRepo {
            repo: input.to_string(),
        };

        let (owner, name) = input.trim().split_once('/').ok_or_else(invalid)?;
        if !is_repo_segment(owner) || !is_repo_segment(name) {
            return Err(invalid());
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RepoSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoSpec {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn is_repo_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}

/// Check a branch, tag or commit name before it is placed in a URL.
///
/// Slashes are allowed between segments (`release/1.x`); empty, `.` and `..`
/// segments, whitespace and control characters are not.
pub fn validate_ref(reference: &str) -> Result<()> {
    let invalid = || FetchError::InvalidRef {
        reference: reference.to_string(),
    };

    if reference.is_empty() || reference.len() > MAX_REF_LEN || reference.starts_with('-') {
        return Err(invalid());
    }

    for segment in reference.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(invalid());
        }
        if !segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'+'))
        {
            return Err(invalid());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_owner_and_name() {
        let repo = RepoSpec::parse("octo-org/hello.world").unwrap();
        assert_eq!(repo.owner(), "octo-org");
        assert_eq!(repo.name(), "hello.world");
        assert_eq!(repo.to_string(), "octo-org/hello.world");
    }

    #[test]
    fn rejects_missing_separator() {
        assert!(matches!(
            RepoSpec::parse("just-a-name"),
            Err(FetchError::InvalidRepo { .. })
        ));
    }

    #[test]
    fn rejects_malformed_identifiers() {
        for input in ["", "/", "owner/", "/name", "a/b/c", "a/..", "own er/name", "a/b?c", "a/b#x"] {
            assert!(RepoSpec::parse(input).is_err(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn from_str_matches_parse() {
        let repo: RepoSpec = "owner/repo".parse().unwrap();
        assert_eq!(repo, RepoSpec::parse("owner/repo").unwrap());
    }

    #[test]
    fn accepts_common_refs() {
        for reference in ["main", "v1.2.3", "release/1.x", "a1b2c3d4", "feature_x+y"] {
            assert!(validate_ref(reference).is_ok(), "{reference:?} should be accepted");
        }
    }

    #[test]
    fn rejects_unsafe_refs() {
        for reference in ["", "../main", "a//b", "main/", "-rf", "a b", "a?b", "x/./y"] {
            assert!(
                matches!(validate_ref(reference), Err(FetchError::InvalidRef { .. })),
                "{reference:?} should be rejected"
            );
        }
    }
}
