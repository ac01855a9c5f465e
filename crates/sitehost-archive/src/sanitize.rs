use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Result of sanitizing an archive entry path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SanitizedPath {
    pub original: String,
    /// Normalized path relative to the extraction base. Empty for the base itself.
    pub relative: PathBuf,
    pub resolved: PathBuf,
}

/// Sanitize an archive entry name against the extraction base.
///
/// The name is normalized with [`normalize_entry_name`], joined onto `base`,
/// and must still lie under `base` afterwards.
pub fn sanitize_entry<B: AsRef<Path>>(name: &str, base: B) -> Result<SanitizedPath> {
    let base = base.as_ref();
    let relative = normalize_entry_name(name)?;
    let resolved = base.join(&relative);

    if !is_descendant(&resolved, base) {
        return Err(Error::PathTraversal {
            entry: name.to_string(),
        });
    }

    Ok(SanitizedPath {
        original: name.to_string(),
        relative,
        resolved,
    })
}

/// Normalize a slash-separated archive path into a relative [`PathBuf`].
///
/// Backslashes count as separators, empty and `.` segments are dropped.
/// Absolute paths, drive prefixes and any `..` segment are rejected outright
/// rather than resolved, so `a/../b` fails even though it stays inside the base.
pub fn normalize_entry_name(name: &str) -> Result<PathBuf> {
    if name.contains('\0') {
        return Err(Error::InvalidPath {
            entry: name.to_string(),
        });
    }

    let traversal = || Error::PathTraversal {
        entry: name.to_string(),
    };

    let unified = name.replace('\\', "/");
    if unified.starts_with('/') {
        return Err(traversal());
    }

    let mut relative = PathBuf::new();
    for (index, segment) in unified.split('/').enumerate() {
        match segment {
            "" | "." => continue,
            ".." => return Err(traversal()),
            _ if index == 0 && is_drive_prefix(segment) => return Err(traversal()),
            _ => {
                // The platform parser gets the last word on what a segment means.
                let mut components = Path::new(segment).components();
                match (components.next(), components.next()) {
                    (Some(Component::Normal(part)), None) => relative.push(part),
                    _ => return Err(traversal()),
                }
            }
        }
    }

    Ok(relative)
}

fn is_drive_prefix(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn is_descendant(resolved: &Path, base: &Path) -> bool {
    resolved.starts_with(base)
        && resolved
            .strip_prefix(base)
            .map(|rest| rest.components().all(|c| matches!(c, Component::Normal(_))))
            .unwrap_or(false)
}
