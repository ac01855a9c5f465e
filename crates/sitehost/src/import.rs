//! Repository snapshot layout.
//!
//! Snapshot archives usually wrap the whole tree in one folder named after
//! the repository and commit (`owner-repo-1a2b3c4/`). Deploys strip that
//! folder, and optionally descend into a subdirectory below it.

use std::path::{Component, Path, PathBuf};

use sitehost_archive::{ArchiveEntry, ExtractOptions, list_entries, normalize_entry_name};

use crate::error::{Error, Result};

/// Validate a user-supplied subdirectory.
///
/// Leading and trailing slashes are stripped and an empty value means "no
/// subdirectory". What remains must pass the same checks as an archive entry
/// name.
pub fn normalize_subdir(raw: Option<&str>) -> Result<Option<PathBuf>> {
    let Some(trimmed) = raw.map(|s| s.trim().trim_matches(|c| c == '/' || c == '\\')) else {
        return Ok(None);
    };
    if trimmed.is_empty() {
        return Ok(None);
    }

    let normalized = normalize_entry_name(trimmed)
        .map_err(|_| Error::validation("invalid_subdir", format!("invalid subdirectory '{trimmed}'")))?;

    Ok((!normalized.as_os_str().is_empty()).then_some(normalized))
}

/// The single folder wrapping every entry, if there is one.
///
/// All entries must share their first segment and at least one must lie
/// below it. A file at the top level means there is no wrapping folder.
pub fn snapshot_root(entries: &[ArchiveEntry]) -> Result<Option<PathBuf>> {
    let mut root: Option<PathBuf> = None;
    let mut nested = false;

    for entry in entries {
        let path = normalize_entry_name(&entry.path)?;
        let mut components = path.components();
        let Some(Component::Normal(first)) = components.next() else {
            continue;
        };
        let has_rest = components.next().is_some();

        if !has_rest && !entry.is_directory {
            return Ok(None);
        }
        nested |= has_rest;

        match &root {
            None => root = Some(PathBuf::from(first)),
            Some(existing) if existing.as_os_str() == first => {}
            Some(_) => return Ok(None),
        }
    }

    Ok(root.filter(|_| nested))
}

/// Extraction options selecting `<root>/<subdir>` of a snapshot.
///
/// # Errors
///
/// [`Error::EmptyArchive`] if the archive has no entries at all.
pub fn snapshot_options(bytes: &[u8], subdir: Option<&Path>) -> Result<ExtractOptions> {
    let entries = list_entries(bytes)?;
    if entries.is_empty() {
        return Err(Error::EmptyArchive);
    }

    let root = snapshot_root(&entries)?;
    let mut prefix = root.unwrap_or_default();
    if let Some(subdir) = subdir {
        prefix.push(subdir);
    }

    tracing::debug!(entries = entries.len(), prefix = %prefix.display(), "snapshot layout");
    Ok(ExtractOptions::default().strip_prefix(prefix))
}
