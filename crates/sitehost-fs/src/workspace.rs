use std::path::{Path, PathBuf};

use crate::{Replacement, ReplaceDirOptions, Result};

/// A uniquely named staging directory.
///
/// Content is built inside [`Workspace::path`] and then either committed over
/// a live directory in one rename, or discarded when the workspace is dropped.
#[derive(Debug)]
pub struct Workspace {
    staging_path: PathBuf,
    committed: bool,
}

impl Workspace {
    /// Create a fresh staging directory below `staging_root`.
    ///
    /// `staging_root` must be on the same filesystem as the eventual
    /// destination, otherwise the commit rename fails.
    pub fn create(staging_root: impl AsRef<Path>) -> Result<Self> {
        let staging_root = staging_root.as_ref();
        crate::ensure_dir(staging_root)?;

        let staging_path = staging_root.join(uuid::Uuid::new_v4().simple().to_string());
        std::fs::create_dir(&staging_path).map_err(|source| crate::Error::CreateDir {
            path: staging_path.clone(),
            source,
        })?;

        Ok(Self {
            staging_path,
            committed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.staging_path
    }

    /// Atomically replace `destination` with the staged tree.
    pub fn commit(self, destination: impl AsRef<Path>) -> Result<Replacement> {
        self.commit_with(destination, ReplaceDirOptions::default())
    }

    pub fn commit_with(
        mut self,
        destination: impl AsRef<Path>,
        options: ReplaceDirOptions,
    ) -> Result<Replacement> {
        let replacement = crate::replace_dir(&self.staging_path, destination, options)?;
        self.committed = true;
        Ok(replacement)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if !self.committed && self.staging_path.exists() {
            if let Err(error) = std::fs::remove_dir_all(&self.staging_path) {
                tracing::warn!(
                    path = %self.staging_path.display(),
                    %error,
                    "failed to discard staging directory"
                );
            }
        }
    }
}
