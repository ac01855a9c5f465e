use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Entry predicate, applied to the path an entry would get under the target.
pub type EntryFilter = Arc<dyn Fn(&Path) -> bool + Send + Sync>;

#[derive(Clone, Default)]
pub struct ExtractOptions {
    pub strip_prefix: Option<PathBuf>,
    pub filter: Option<EntryFilter>,
    pub max_unpacked_bytes: Option<u64>,
}

impl fmt::Debug for ExtractOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractOptions")
            .field("strip_prefix", &self.strip_prefix)
            .field("filter", &self.filter.as_ref().map(|_| "{ ... }"))
            .field("max_unpacked_bytes", &self.max_unpacked_bytes)
            .finish()
    }
}

impl ExtractOptions {
    /// Keep only entries below `prefix` and extract them relative to it.
    ///
    /// Matching is per path component: prefix `site/docs` keeps
    /// `site/docs/index.md` but not `site/docs-old/index.md`. An empty prefix
    /// keeps everything.
    pub fn strip_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        let prefix = prefix.into();
        self.strip_prefix = (!prefix.as_os_str().is_empty()).then_some(prefix);
        self
    }

    pub fn filter(mut self, predicate: impl Fn(&Path) -> bool + Send + Sync + 'static) -> Self {
        self.filter = Some(Arc::new(predicate));
        self
    }

    pub fn max_unpacked_bytes(mut self, limit: u64) -> Self {
        self.max_unpacked_bytes = Some(limit);
        self
    }

    /// Map a sanitized entry path to its output path, or `None` to skip it.
    pub(crate) fn select(&self, relative: &Path) -> Option<PathBuf> {
        let mapped = match &self.strip_prefix {
            Some(prefix) => relative.strip_prefix(prefix).ok()?.to_path_buf(),
            None => relative.to_path_buf(),
        };

        if mapped.as_os_str().is_empty() {
            return None;
        }

        match &self.filter {
            Some(predicate) if !predicate(&mapped) => None,
            _ => Some(mapped),
        }
    }
}
