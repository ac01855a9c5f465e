use std::time::Duration;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid repository '{repo}': expected <owner>/<name>")]
    InvalidRepo { repo: String },

    #[error("invalid ref '{reference}'")]
    InvalidRef { reference: String },

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("snapshot exceeds the limit of {limit} bytes")]
    TooLarge { limit: u64 },
}

impl FetchError {
    pub(crate) fn network(url: &str, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Network {
            url: url.to_string(),
            source: Box::new(source),
        }
    }

    /// The remote answered "not found", typically a wrong repository or ref.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
