use crate::{Error, Result};
use std::path::Path;

/// Create `path` and any missing ancestors. Idempotent.
///
/// Fails with [`Error::NotADirectory`] when something other than a directory
/// already occupies the path.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => return Ok(()),
        Ok(_) => {
            return Err(Error::NotADirectory {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {}
    }

    std::fs::create_dir_all(path).map_err(|source| {
        if path.exists() && !path.is_dir() {
            Error::NotADirectory {
                path: path.to_path_buf(),
            }
        } else {
            Error::CreateDir {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_missing_ancestors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("owner").join("site");
        ensure_dir(&path).unwrap();
        assert!(path.is_dir());
    }

    #[test]
    fn is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("site");
        ensure_dir(&path).unwrap();
        std::fs::write(path.join("index.html"), "hi").unwrap();
        ensure_dir(&path).unwrap();
        assert!(path.join("index.html").exists());
    }

    #[test]
    fn rejects_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("site");
        std::fs::write(&path, "not a dir").unwrap();
        let err = ensure_dir(&path).unwrap_err();
        assert!(matches!(err, Error::NotADirectory { .. }));
    }

    #[test]
    fn rejects_file_in_ancestor_chain() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("owner"), "file").unwrap();
        let err = ensure_dir(dir.path().join("owner").join("site")).unwrap_err();
        assert!(matches!(err, Error::CreateDir { .. } | Error::NotADirectory { .. }));
    }
}
