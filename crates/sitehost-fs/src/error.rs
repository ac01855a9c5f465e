use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create directory '{path}': {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("'{path}' exists and is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("failed to read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to replace '{path}': {source}")]
    ReplaceDir { path: PathBuf, source: io::Error },

    #[error("retry limit exceeded while moving '{path}': {source}")]
    RetryLimitExceeded { path: PathBuf, source: io::Error },
}

impl Error {
    /// Path the failed operation was acting on.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::CreateDir { path, .. }
            | Self::NotADirectory { path }
            | Self::Read { path, .. }
            | Self::Write { path, .. }
            | Self::ReplaceDir { path, .. }
            | Self::RetryLimitExceeded { path, .. } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
