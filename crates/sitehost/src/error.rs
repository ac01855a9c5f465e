//! Service error taxonomy.
//!
//! Every variant maps to a stable machine code (the `error` field of
//! [`ErrorBody`]) and to the HTTP status a routing layer should answer with.

use std::path::PathBuf;

use serde::Serialize;
use sitehost_fetch::FetchError;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Unauthorized,
    NotFound,
    TooLarge,
    Archive,
    EmptyArchive,
    PathTraversal,
    EmptyResult,
    Fetch,
    Storage,
    Registry,
    Internal,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{message}")]
    Validation { code: &'static str, message: String },

    #[error("no authenticated owner")]
    Unauthorized,

    #[error("site '{site}' not found")]
    NotFound { site: String },

    #[error("bundle exceeds the limit of {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("invalid archive: {reason}")]
    Archive { reason: String },

    #[error("archive has no entries")]
    EmptyArchive,

    #[error("entry '{entry}' would be written outside the site directory")]
    PathTraversal { entry: String },

    #[error("nothing to deploy after filtering")]
    EmptyResult,

    #[error("snapshot fetch failed: {0}")]
    Fetch(#[source] FetchError),

    #[error("storage failure at '{path}': {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("registry failure: {0}")]
    Registry(#[from] sitehost_registry::Error),

    #[error("internal error: {reason}")]
    Internal { reason: String },
}

impl Error {
    pub(crate) fn validation(code: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::TooLarge { .. } => ErrorKind::TooLarge,
            Self::Archive { .. } => ErrorKind::Archive,
            Self::EmptyArchive => ErrorKind::EmptyArchive,
            Self::PathTraversal { .. } => ErrorKind::PathTraversal,
            Self::EmptyResult => ErrorKind::EmptyResult,
            Self::Fetch(_) => ErrorKind::Fetch,
            Self::Storage { .. } => ErrorKind::Storage,
            Self::Registry(_) => ErrorKind::Registry,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { code, .. } => *code,
            Self::Unauthorized => "unauthorized",
            Self::NotFound { .. } => "not_found",
            Self::TooLarge { .. } => "bundle_too_large",
            Self::Archive { .. } => "invalid_archive",
            Self::EmptyArchive => "empty_archive",
            Self::PathTraversal { .. } => "path_traversal",
            Self::EmptyResult => "empty_result",
            Self::Fetch(_) => "fetch_failed",
            Self::Storage { .. } => "storage_error",
            Self::Registry(_) => "db_error",
            Self::Internal { .. } => "internal_error",
        }
    }

    pub fn status(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation | ErrorKind::EmptyArchive => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::NotFound => 404,
            ErrorKind::TooLarge => 413,
            ErrorKind::Archive | ErrorKind::PathTraversal | ErrorKind::EmptyResult => 422,
            ErrorKind::Fetch => 502,
            ErrorKind::Storage | ErrorKind::Registry | ErrorKind::Internal => 500,
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody { error: self.code() }
    }
}

/// JSON error payload: `{ "error": "<code>" }`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

impl From<sitehost_fs::Error> for Error {
    fn from(e: sitehost_fs::Error) -> Self {
        Self::Storage {
            path: e.path().to_path_buf(),
            source: Box::new(e),
        }
    }
}

impl From<sitehost_archive::Error> for Error {
    fn from(e: sitehost_archive::Error) -> Self {
        use sitehost_archive::Error as A;

        match e {
            A::Corrupted { reason } => Self::Archive { reason },
            A::Symlink { entry } => Self::Archive {
                reason: format!("symbolic link entry '{entry}'"),
            },
            A::PathTraversal { entry } | A::InvalidPath { entry } => Self::PathTraversal { entry },
            A::EmptyResult => Self::EmptyResult,
            A::TooLarge { limit } => Self::TooLarge { limit },
            A::ExtractionFailed { path, source } => Self::Storage {
                path,
                source: Box::new(source),
            },
            A::Storage { source } => source.into(),
        }
    }
}

impl From<FetchError> for Error {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::InvalidRepo { .. } => Self::validation("invalid_repo", e.to_string()),
            FetchError::InvalidRef { .. } => Self::validation("invalid_ref", e.to_string()),
            FetchError::TooLarge { limit } => Self::TooLarge { limit },
            other => Self::Fetch(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
