use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid {kind} identifier '{value}'")]
    InvalidId { kind: &'static str, value: String },

    #[error("could not allocate an unused site id after {attempts} attempts")]
    IdExhausted { attempts: usize },

    #[error("registry file '{path}' is not valid: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("registry file '{path}' has unsupported format version {version}")]
    UnsupportedVersion { path: PathBuf, version: u32 },

    #[error("failed to serialize registry: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("registry storage failed: {0}")]
    Storage(#[from] sitehost_fs::Error),

    #[error("registry lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, Error>;
