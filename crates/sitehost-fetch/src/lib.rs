//! Repository snapshot download.
//!
//! # Architecture
//!
//! - [`HttpClient`] - minimal streaming GET abstraction, with a `reqwest` implementation
//! - [`RepoSpec`] - validated `<owner>/<name>` repository identifier
//! - [`SnapshotSource`] - fetches a snapshot archive for a repository and optional ref
//! - [`GithubSnapshots`] - GitHub `zipball` implementation with timeout and size cap
//!
//! Fetching is mechanism only: there is no retry and no caching.

mod error;
mod http;
mod options;
mod repo;
mod snapshot;

pub use error::{FetchError, Result};
pub use http::{BoxStream, HttpClient, HttpResponse};
pub use options::SnapshotOptions;
pub use repo::{RepoSpec, validate_ref};
pub use snapshot::{GithubSnapshots, SnapshotSource};

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
