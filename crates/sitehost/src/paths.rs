use std::path::{Path, PathBuf};

use sitehost_registry::{OwnerId, SiteId};

use crate::error::Result;

const STAGING_DIR: &str = ".staging";

/// Maps `(owner, site)` to `<root>/<owner>/<site>`.
///
/// Segments are not re-validated here; [`OwnerId`] and [`SiteId`] can only
/// hold safe directory names.
#[derive(Clone, Debug)]
pub struct SitePaths {
    root: PathBuf,
}

impl SitePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, owner: &OwnerId, site: &SiteId) -> PathBuf {
        self.root.join(owner).join(site)
    }

    /// Create `path` and its missing ancestors. Succeeds if it already exists.
    pub fn ensure(&self, path: &Path) -> Result<()> {
        sitehost_fs::ensure_dir(path)?;
        Ok(())
    }

    /// Where deploys are assembled before the swap. Shares a filesystem with
    /// every site directory and can never be an owner directory.
    pub fn staging_dir(&self) -> PathBuf {
        self.root.join(STAGING_DIR)
    }
}
