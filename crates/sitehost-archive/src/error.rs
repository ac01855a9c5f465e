use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not a valid zip archive: {reason}")]
    Corrupted { reason: String },

    #[error("path traversal detected: entry '{entry}' would be written outside the target directory")]
    PathTraversal { entry: String },

    #[error("entry path contains a null byte: '{entry}'")]
    InvalidPath { entry: String },

    #[error("entry '{entry}' is a symbolic link")]
    Symlink { entry: String },

    #[error("no files left to extract after filtering")]
    EmptyResult,

    #[error("unpacked content exceeds the limit of {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("failed to extract '{path}': {source}")]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error("storage operation failed: {source}")]
    Storage { source: sitehost_fs::Error },
}

impl From<sitehost_fs::Error> for Error {
    fn from(e: sitehost_fs::Error) -> Self {
        Self::Storage { source: e }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Self::Corrupted {
            reason: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
