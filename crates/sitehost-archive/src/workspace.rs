use std::path::Path;

use sitehost_fs::{Leftover, ReplaceDirOptions, Workspace};

use crate::entry::ExtractReport;
use crate::error::Result;
use crate::extract::extract;
use crate::options::ExtractOptions;

/// An extraction that has completed inside a staging directory but is not
/// yet visible at its destination.
pub struct StagedExtraction {
    workspace: Workspace,
    report: ExtractReport,
}

/// Result of committing a [`StagedExtraction`].
#[derive(Debug)]
pub struct Committed {
    pub report: ExtractReport,
    /// The previous content could not be deleted after the swap.
    pub leftover: Option<Leftover>,
}

impl StagedExtraction {
    /// Swap the staged tree into `destination`, replacing whatever was there.
    ///
    /// Target paths in the returned report point at `destination`.
    pub fn commit(self, destination: impl AsRef<Path>) -> Result<Committed> {
        self.commit_with(destination, ReplaceDirOptions::default())
    }

    /// [`commit`](Self::commit) with explicit swap options.
    pub fn commit_with(self, destination: impl AsRef<Path>, options: ReplaceDirOptions) -> Result<Committed> {
        let destination = destination.as_ref();
        let Self { workspace, mut report } = self;

        let replacement = workspace.commit_with(destination, options)?;
        for entry in &mut report.entries {
            entry.target_path = destination.join(&entry.relative_path);
        }

        Ok(Committed {
            report,
            leftover: replacement.leftover,
        })
    }

    pub fn abort(self) {
        drop(self.workspace);
    }

    pub fn report(&self) -> &ExtractReport {
        &self.report
    }

    pub fn staging_path(&self) -> &Path {
        self.workspace.path()
    }
}

/// Extract into a fresh directory under `staging_root`.
///
/// Nothing outside `staging_root` changes until [`StagedExtraction::commit`].
/// On error, or if the result is dropped, the staging directory is removed.
pub fn extract_staged(
    bytes: &[u8],
    staging_root: impl AsRef<Path>,
    options: &ExtractOptions,
) -> Result<StagedExtraction> {
    let workspace = Workspace::create(staging_root)?;
    let report = extract(bytes, workspace.path(), options)?;
    Ok(StagedExtraction { workspace, report })
}
