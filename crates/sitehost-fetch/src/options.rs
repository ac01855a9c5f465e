use std::fmt;
use std::time::Duration;

/// Settings for [`GithubSnapshots`](crate::GithubSnapshots).
///
/// # Examples
///
/// ```
/// use sitehost_fetch::SnapshotOptions;
/// use std::time::Duration;
///
/// let options = SnapshotOptions::default()
///     .timeout(Duration::from_secs(30))
///     .token(Some("ghp_example".to_string()));
/// ```
#[derive(Clone)]
pub struct SnapshotOptions {
    /// Base of the REST API, without a trailing slash.
    ///
    /// Default: `https://api.github.com`
    pub api_base: String,

    /// Sent as `Authorization: Bearer <token>` when present.
    pub token: Option<String>,

    /// Upper bound for the whole request, body included.
    ///
    /// Default: 60s
    pub timeout: Duration,

    /// Largest snapshot accepted, in bytes.
    ///
    /// Default: 50 MiB
    pub max_bytes: u64,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            token: None,
            timeout: Duration::from_secs(60),
            max_bytes: 50 * 1024 * 1024,
        }
    }
}

impl fmt::Debug for SnapshotOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotOptions")
            .field("api_base", &self.api_base)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("max_bytes", &self.max_bytes)
            .finish()
    }
}

impl SnapshotOptions {
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Empty tokens are treated as absent.
    pub fn token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}
