use std::convert::Infallible;
use std::sync::Mutex;
use std::time::Duration;

use bytes::Bytes;
use futures_util::stream;
use sitehost_fetch::{
    FetchError, GithubSnapshots, HttpClient, HttpResponse, RepoSpec, SnapshotOptions,
    SnapshotSource,
};

#[derive(Default)]
struct MockClient {
    status: u16,
    chunks: Vec<&'static [u8]>,
    content_length: Option<u64>,
    delay: Option<Duration>,
    requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl MockClient {
    fn ok(chunks: &[&'static str]) -> Self {
        Self {
            status: 200,
            chunks: body(chunks),
            ..Self::default()
        }
    }
}

impl HttpClient for MockClient {
    type Error = Infallible;

    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<HttpResponse<Self::Error>, Self::Error> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), headers.to_vec()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let chunks: Vec<Result<Bytes, Infallible>> =
            self.chunks.iter().map(|c| Ok(Bytes::from_static(c))).collect();
        Ok(HttpResponse {
            status: self.status,
            content_length: self.content_length,
            body: Box::pin(stream::iter(chunks)),
        })
    }
}

fn body(chunks: &[&'static str]) -> Vec<&'static [u8]> {
    chunks.iter().map(|chunk| chunk.as_bytes()).collect()
}

fn repo() -> RepoSpec {
    RepoSpec::parse("octo/site").unwrap()
}

#[tokio::test]
async fn concatenates_body_chunks() {
    let snapshots = GithubSnapshots::new(
        MockClient::ok(&["PK\x03\x04", "rest"]),
        SnapshotOptions::default(),
    );

    let bytes = snapshots.fetch(&repo(), None).await.unwrap();

    assert_eq!(&bytes[..], b"PK\x03\x04rest");
}

#[tokio::test]
async fn sends_ref_and_token() {
    let client = MockClient::ok(&["zip"]);
    let snapshots = GithubSnapshots::new(
        client,
        SnapshotOptions::default().token(Some("t0ken".into())),
    );

    snapshots.fetch(&repo(), Some("v2")).await.unwrap();

    let requests = snapshots.client().requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let (url, headers) = &requests[0];
    assert_eq!(url, "https://api.github.com/repos/octo/site/zipball/v2");
    assert!(headers.contains(&("Authorization".to_string(), "Bearer t0ken".to_string())));
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let client = MockClient {
        status: 404,
        ..MockClient::default()
    };
    let snapshots = GithubSnapshots::new(client, SnapshotOptions::default());

    let err = snapshots.fetch(&repo(), Some("missing")).await.unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 404, .. }));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn declared_length_over_limit_is_rejected() {
    let client = MockClient {
        status: 200,
        content_length: Some(1024),
        chunks: body(&["small"]),
        ..MockClient::default()
    };
    let snapshots = GithubSnapshots::new(client, SnapshotOptions::default().max_bytes(100));

    let err = snapshots.fetch(&repo(), None).await.unwrap_err();

    assert!(matches!(err, FetchError::TooLarge { limit: 100 }));
}

#[tokio::test]
async fn streamed_body_over_limit_is_rejected() {
    let snapshots = GithubSnapshots::new(
        MockClient::ok(&["0123456789", "0123456789"]),
        SnapshotOptions::default().max_bytes(15),
    );

    let err = snapshots.fetch(&repo(), None).await.unwrap_err();

    assert!(matches!(err, FetchError::TooLarge { limit: 15 }));
}

#[tokio::test]
async fn slow_response_times_out() {
    let client = MockClient {
        delay: Some(Duration::from_millis(500)),
        ..MockClient::ok(&["zip"])
    };
    let snapshots = GithubSnapshots::new(
        client,
        SnapshotOptions::default().timeout(Duration::from_millis(20)),
    );

    let err = snapshots.fetch(&repo(), None).await.unwrap_err();

    assert!(matches!(err, FetchError::Timeout(d) if d == Duration::from_millis(20)));
}

#[tokio::test]
async fn invalid_ref_is_rejected_before_request() {
    let snapshots = GithubSnapshots::new(MockClient::ok(&["zip"]), SnapshotOptions::default());

    let err = snapshots.fetch(&repo(), Some("../../etc")).await.unwrap_err();

    assert!(matches!(err, FetchError::InvalidRef { .. }));
    assert!(snapshots.client().requests.lock().unwrap().is_empty());
}
