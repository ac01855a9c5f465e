use std::future::Future;

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use url::Url;

use crate::error::{FetchError, Result};
use crate::http::HttpClient;
use crate::options::SnapshotOptions;
use crate::repo::{RepoSpec, validate_ref};

/// Source of repository snapshot archives.
pub trait SnapshotSource: Send + Sync {
    /// Fetch the zip snapshot of `repo` at `reference`, or at the default
    /// branch when `reference` is `None`.
    fn fetch(
        &self,
        repo: &RepoSpec,
        reference: Option<&str>,
    ) -> impl Future<Output = Result<Bytes>> + Send;
}

/// Snapshots from the GitHub REST API `zipball` endpoint.
#[derive(Debug)]
pub struct GithubSnapshots<C> {
    client: C,
    options: SnapshotOptions,
}

impl<C: HttpClient> GithubSnapshots<C> {
    pub fn new(client: C, options: SnapshotOptions) -> Self {
        Self { client, options }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn options(&self) -> &SnapshotOptions {
        &self.options
    }

    /// `<api_base>/repos/<owner>/<name>/zipball[/<ref>]`
    pub fn zipball_url(&self, repo: &RepoSpec, reference: Option<&str>) -> Result<Url> {
        let mut url = Url::parse(&self.options.api_base)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {e}", self.options.api_base)))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| FetchError::InvalidUrl(self.options.api_base.clone()))?;
            segments
                .pop_if_empty()
                .extend(["repos", repo.owner(), repo.name(), "zipball"]);
            if let Some(reference) = reference {
                segments.extend(reference.split('/'));
            }
        }

        Ok(url)
    }

    fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![
            ("Accept".to_string(), "application/vnd.github+json".to_string()),
            ("X-GitHub-Api-Version".to_string(), "2022-11-28".to_string()),
        ];
        if let Some(token) = &self.options.token {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        headers
    }

    async fn download(&self, url: &str, headers: &[(String, String)]) -> Result<Bytes> {
        let limit = self.options.max_bytes;
        let response = self
            .client
            .get(url, headers)
            .await
            .map_err(|e| FetchError::network(url, e))?;

        if !response.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status,
            });
        }

        if response.content_length.is_some_and(|len| len > limit) {
            return Err(FetchError::TooLarge { limit });
        }

        let mut body = response.body;
        let mut buffer = BytesMut::new();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| FetchError::network(url, e))?;
            if buffer.len() as u64 + chunk.len() as u64 > limit {
                return Err(FetchError::TooLarge { limit });
            }
            buffer.extend_from_slice(&chunk);
        }

        Ok(buffer.freeze())
    }
}

impl<C: HttpClient> SnapshotSource for GithubSnapshots<C> {
    async fn fetch(&self, repo: &RepoSpec, reference: Option<&str>) -> Result<Bytes> {
        if let Some(reference) = reference {
            validate_ref(reference)?;
        }

        let url = self.zipball_url(repo, reference)?;
        let headers = self.headers();
        tracing::debug!(%repo, reference, url = %url, "fetching snapshot");

        let bytes = tokio::time::timeout(self.options.timeout, self.download(url.as_str(), &headers))
            .await
            .map_err(|_| FetchError::Timeout(self.options.timeout))??;

        tracing::debug!(%repo, bytes = bytes.len(), "snapshot fetched");
        Ok(bytes)
    }
}
