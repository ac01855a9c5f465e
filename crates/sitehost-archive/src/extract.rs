//! Two-pass zip extraction.
//!
//! Pass one opens every entry's metadata, sanitizes its name and decides
//! where it goes. Any unsafe name aborts the whole extraction before a single
//! byte is written. Pass two decompresses the selected entries.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::entry::{ExtractReport, ExtractedEntry};
use crate::error::{Error, Result};
use crate::options::ExtractOptions;
use crate::sanitize::sanitize_entry;

const S_IFMT: u32 = 0o170000;
const S_IFLNK: u32 = 0o120000;

/// An entry that survived sanitization and selection.
struct Planned {
    index: usize,
    archive_path: String,
    relative_path: PathBuf,
    target_path: PathBuf,
    declared_size: u64,
}

pub(crate) fn open(bytes: &[u8]) -> Result<ZipArchive<Cursor<&[u8]>>> {
    if bytes.is_empty() {
        return Err(Error::Corrupted {
            reason: "archive buffer is empty".to_string(),
        });
    }
    Ok(ZipArchive::new(Cursor::new(bytes))?)
}

/// Extract the regular files of a zip archive held in memory into `target`.
///
/// Directory entries are skipped; directories are created as needed for the
/// files beneath them. Existing files at a target path are overwritten. When
/// several entries map to the same path the last one wins and is counted once.
///
/// # Errors
///
/// - [`Error::Corrupted`] if `bytes` is empty or not a zip archive, or if a
///   selected file would also have to be the parent directory of another
/// - [`Error::PathTraversal`] if any entry, selected or not, would resolve
///   outside `target`. Nothing is written in that case.
/// - [`Error::Symlink`] if a selected file entry is a symbolic link
/// - [`Error::EmptyResult`] if no file is left after prefix stripping and filtering
/// - [`Error::TooLarge`] if the unpacked size exceeds
///   [`ExtractOptions::max_unpacked_bytes`]
pub fn extract(bytes: &[u8], target: impl AsRef<Path>, options: &ExtractOptions) -> Result<ExtractReport> {
    let target = target.as_ref();
    let mut archive = open(bytes)?;

    let planned = plan(&mut archive, target, options)?;
    if planned.is_empty() {
        return Err(Error::EmptyResult);
    }

    if let Some(limit) = options.max_unpacked_bytes {
        let declared: u64 = planned.iter().map(|p| p.declared_size).sum();
        if declared > limit {
            return Err(Error::TooLarge { limit });
        }
    }

    sitehost_fs::ensure_dir(target)?;

    let mut report = ExtractReport::default();
    for entry in planned {
        let budget = options
            .max_unpacked_bytes
            .map(|limit| limit.saturating_sub(report.total_bytes));
        let written = write_entry(&mut archive, &entry, budget)?;

        report.total_bytes += written;
        report.files_written += 1;
        report.entries.push(ExtractedEntry {
            archive_path: entry.archive_path,
            relative_path: entry.relative_path,
            target_path: entry.target_path,
            size: written,
        });
    }

    tracing::debug!(
        target = %target.display(),
        files = report.files_written,
        bytes = report.total_bytes,
        "archive extracted"
    );
    Ok(report)
}

fn plan(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    target: &Path,
    options: &ExtractOptions,
) -> Result<Vec<Planned>> {
    let mut planned: Vec<Planned> = Vec::new();
    let mut slots: HashMap<PathBuf, usize> = HashMap::new();

    for index in 0..archive.len() {
        let file = archive.by_index_raw(index)?;
        let name = file.name().to_string();

        // Every entry is checked, including the ones the selection drops.
        let sanitized = sanitize_entry(&name, target)?;

        if file.is_dir() {
            continue;
        }

        let Some(relative_path) = options.select(&sanitized.relative) else {
            continue;
        };

        if file.unix_mode().is_some_and(|mode| mode & S_IFMT == S_IFLNK) {
            return Err(Error::Symlink { entry: name });
        }

        let target_path = target.join(&relative_path);
        if !target_path.starts_with(target) {
            return Err(Error::PathTraversal { entry: name });
        }

        let entry = Planned {
            index,
            archive_path: name,
            relative_path: relative_path.clone(),
            target_path,
            declared_size: file.size(),
        };
        match slots.get(&relative_path) {
            Some(&slot) => planned[slot] = entry,
            None => {
                slots.insert(relative_path, planned.len());
                planned.push(entry);
            }
        }
    }

    for entry in &planned {
        if let Some(parent) = entry
            .relative_path
            .ancestors()
            .skip(1)
            .find(|ancestor| slots.contains_key(*ancestor))
        {
            return Err(Error::Corrupted {
                reason: format!(
                    "'{}' is a file and also the parent of '{}'",
                    parent.display(),
                    entry.archive_path
                ),
            });
        }
    }

    Ok(planned)
}

fn write_entry(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    entry: &Planned,
    budget: Option<u64>,
) -> Result<u64> {
    if let Some(parent) = entry.target_path.parent() {
        sitehost_fs::ensure_dir(parent)?;
    }

    let file = archive.by_index(entry.index)?;
    let mut out = File::create(&entry.target_path).map_err(|source| Error::ExtractionFailed {
        path: entry.target_path.clone(),
        source,
    })?;

    // Declared sizes can lie; cap what is actually inflated.
    let written = match budget {
        Some(limit) => {
            let copied = copy(&mut file.take(limit.saturating_add(1)), &mut out, entry)?;
            if copied > limit {
                return Err(Error::TooLarge { limit });
            }
            copied
        }
        None => {
            let mut file = file;
            copy(&mut file, &mut out, entry)?
        }
    };

    Ok(written)
}

fn copy<R: Read>(reader: &mut R, out: &mut File, entry: &Planned) -> Result<u64> {
    io::copy(reader, out).map_err(|source| match source.kind() {
        io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => Error::Corrupted {
            reason: format!("{}: {source}", entry.archive_path),
        },
        _ => Error::ExtractionFailed {
            path: entry.target_path.clone(),
            source,
        },
    })
}
