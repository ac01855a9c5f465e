use std::path::PathBuf;

use crate::error::Result;

/// An entry as stored in the archive, before any sanitization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Slash-separated path exactly as recorded in the archive.
    pub path: String,
    pub is_directory: bool,
    pub size: u64,
}

/// A file written by an extraction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedEntry {
    pub archive_path: String,
    pub relative_path: PathBuf,
    pub target_path: PathBuf,
    pub size: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractReport {
    pub files_written: usize,
    pub total_bytes: u64,
    pub entries: Vec<ExtractedEntry>,
}

/// List the entries of an in-memory zip archive in central directory order.
pub fn list_entries(bytes: &[u8]) -> Result<Vec<ArchiveEntry>> {
    let mut archive = crate::extract::open(bytes)?;
    let mut entries = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let file = archive.by_index_raw(index)?;
        entries.push(ArchiveEntry {
            path: file.name().to_string(),
            is_directory: file.is_dir(),
            size: file.size(),
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn archive(names: &[&str]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for name in names {
            if name.ends_with('/') {
                writer.add_directory(*name, SimpleFileOptions::default()).unwrap();
            } else {
                writer.start_file(*name, SimpleFileOptions::default()).unwrap();
                writer.write_all(name.as_bytes()).unwrap();
            }
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn lists_entries_in_order() {
        let bytes = archive(&["repo-1/", "repo-1/index.html", "repo-1/docs/a.md"]);
        let entries = list_entries(&bytes).unwrap();
        let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["repo-1/", "repo-1/index.html", "repo-1/docs/a.md"]);
        assert!(entries[0].is_directory);
        assert!(!entries[1].is_directory);
        assert_eq!(entries[1].size, "repo-1/index.html".len() as u64);
    }

    #[test]
    fn empty_archive_has_no_entries() {
        let bytes = archive(&[]);
        assert!(list_entries(&bytes).unwrap().is_empty());
    }

    #[test]
    fn garbage_is_rejected() {
        let result = list_entries(&[0xDE, 0xAD, 0xBE, 0xEF]);
        assert!(matches!(result, Err(crate::Error::Corrupted { .. })));
    }

    #[test]
    fn report_defaults_to_empty() {
        let report = ExtractReport::default();
        assert_eq!(report.files_written, 0);
        assert_eq!(report.total_bytes, 0);
        assert!(report.entries.is_empty());
    }
}
