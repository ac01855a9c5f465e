//! Site operations: create, list and the two deploy flavours.
//!
//! Both deploys are full replacements. The new tree is extracted into a
//! staging directory beside the sites and swapped in with two renames, so a
//! reader sees the old content, the new content, or for a moment no site
//! directory at all, never a mix. A per-site lock serializes concurrent
//! deploys to the same site.

use std::path::PathBuf;

use bytes::Bytes;
use sitehost_archive::{Committed, ExtractOptions, extract_staged};
use sitehost_fetch::{RepoSpec, SnapshotSource, validate_ref};
use sitehost_fs::{Leftover, ReplaceDirOptions};
use sitehost_registry::{OwnerId, Site, SiteId, SiteRegistry};
use tokio::sync::OwnedMutexGuard;

use crate::api::{CreateSite, CreatedSite, DeploySource, DeployStatus, Deployed, RepoDeploy, SiteList};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::import::{normalize_subdir, snapshot_options};
use crate::lock::SiteLocks;
use crate::paths::SitePaths;

/// How archive paths map onto the site directory.
enum Layout {
    /// Paths are used as they are.
    Bundle,
    /// The wrapping folder is stripped, then `subdir` is selected.
    Snapshot { subdir: Option<PathBuf> },
}

pub struct SiteService<R, S> {
    paths: SitePaths,
    registry: R,
    snapshots: S,
    locks: SiteLocks,
    replace: ReplaceDirOptions,
    max_archive_bytes: u64,
    max_unpacked_bytes: u64,
}

impl<R: SiteRegistry, S: SnapshotSource> SiteService<R, S> {
    pub fn new(config: &Config, registry: R, snapshots: S) -> Self {
        Self {
            paths: SitePaths::new(&config.sites_dir),
            registry,
            snapshots,
            locks: SiteLocks::new(),
            replace: ReplaceDirOptions::default(),
            max_archive_bytes: config.max_archive_bytes,
            max_unpacked_bytes: config.max_unpacked_bytes,
        }
    }

    /// Options for swapping staged content over the live site directory.
    pub fn with_replace_options(mut self, replace: ReplaceDirOptions) -> Self {
        self.replace = replace;
        self
    }

    pub fn paths(&self) -> &SitePaths {
        &self.paths
    }

    pub fn snapshots(&self) -> &S {
        &self.snapshots
    }

    /// Persist a new site and create its empty content directory.
    pub fn create_site(&self, principal: Option<&str>, request: CreateSite) -> Result<CreatedSite> {
        let owner = authenticate(principal)?;
        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::validation("missing_fields", "site name is required"))?;

        let site = self.registry.create(&owner, name)?;
        self.paths.ensure(&self.paths.resolve(&owner, &site.id))?;

        tracing::info!(%owner, site = %site.id, "site created");
        Ok(CreatedSite {
            id: site.id,
            name: site.name,
        })
    }

    pub fn list_sites(&self, principal: Option<&str>) -> Result<SiteList> {
        let owner = authenticate(principal)?;
        let sites = self.registry.list(&owner)?;
        Ok(SiteList {
            sites: sites.into_iter().map(Into::into).collect(),
        })
    }

    /// Replace the site's content with an uploaded zip bundle.
    pub async fn deploy_upload(
        &self,
        principal: Option<&str>,
        site_id: &str,
        bundle: Option<Bytes>,
    ) -> Result<Deployed> {
        let owner = authenticate(principal)?;
        let site = self.lookup(&owner, site_id)?;

        let bundle = bundle.ok_or_else(|| Error::validation("missing_bundle", "no bundle uploaded"))?;
        if bundle.len() as u64 > self.max_archive_bytes {
            return Err(Error::TooLarge {
                limit: self.max_archive_bytes,
            });
        }

        let warnings = self.replace_content(&site, bundle, Layout::Bundle).await?;
        Ok(Deployed {
            status: DeployStatus::Deployed,
            source: None,
            warnings,
        })
    }

    /// Replace the site's content with a repository snapshot.
    ///
    /// The request is validated completely before the site is looked up and
    /// before any network call.
    pub async fn deploy_repository(
        &self,
        principal: Option<&str>,
        site_id: &str,
        request: RepoDeploy,
    ) -> Result<Deployed> {
        let owner = authenticate(principal)?;

        let repo = RepoSpec::parse(request.repo.as_deref().unwrap_or_default())?;
        let subdir = normalize_subdir(request.subdir.as_deref())?;
        let reference = non_empty(request.reference.as_deref());
        if let Some(reference) = reference {
            validate_ref(reference)?;
        }

        let site = self.lookup(&owner, site_id)?;

        let archive = self.snapshots.fetch(&repo, reference).await?;
        let warnings = self
            .replace_content(&site, archive, Layout::Snapshot { subdir })
            .await?;

        Ok(Deployed {
            status: DeployStatus::Deployed,
            source: Some(DeploySource {
                repo: repo.to_string(),
                reference: reference.map(str::to_string),
                subdir: non_empty(request.subdir.as_deref()).map(str::to_string),
            }),
            warnings,
        })
    }

    fn lookup(&self, owner: &OwnerId, site_id: &str) -> Result<Site> {
        let not_found = || Error::NotFound {
            site: site_id.to_string(),
        };
        let id = SiteId::parse(site_id).map_err(|_| not_found())?;
        self.registry.find(owner, &id)?.ok_or_else(not_found)
    }

    async fn replace_content(&self, site: &Site, archive: Bytes, layout: Layout) -> Result<Vec<String>> {
        let target = self.paths.resolve(&site.owner_id, &site.id);
        let staging = self.paths.staging_dir();
        let limit = self.max_unpacked_bytes;
        let replace = self.replace;

        let guard = self.locks.acquire(&site.owner_id, &site.id).await;
        let committed = tokio::task::spawn_blocking(move || {
            stage_and_swap(guard, &archive, layout, limit, staging, target, replace)
        })
        .await
        .map_err(|e| Error::Internal {
            reason: format!("deploy task failed: {e}"),
        })??;

        let report = &committed.report;
        tracing::info!(
            owner = %site.owner_id,
            site = %site.id,
            files = report.files_written,
            bytes = report.total_bytes,
            "site deployed"
        );

        Ok(committed.leftover.iter().map(leftover_warning).collect())
    }
}

fn leftover_warning(leftover: &Leftover) -> String {
    format!(
        "previous content could not be removed from '{}': {}",
        leftover.path.display(),
        leftover.error
    )
}

/// Runs on the blocking pool. The guard moves in so the site stays locked
/// until the swap finishes, even if the awaiting caller is dropped.
fn stage_and_swap(
    _guard: OwnedMutexGuard<()>,
    archive: &[u8],
    layout: Layout,
    limit: u64,
    staging: PathBuf,
    target: PathBuf,
    replace: ReplaceDirOptions,
) -> Result<Committed> {
    let options = match layout {
        Layout::Bundle => ExtractOptions::default(),
        Layout::Snapshot { subdir } => snapshot_options(archive, subdir.as_deref())?,
    }
    .max_unpacked_bytes(limit);

    let staged = extract_staged(archive, &staging, &options)?;
    tracing::debug!(
        staging = %staged.staging_path().display(),
        files = staged.report().files_written,
        "deploy staged"
    );
    Ok(staged.commit_with(&target, replace)?)
}

fn authenticate(principal: Option<&str>) -> Result<OwnerId> {
    let principal = non_empty(principal).ok_or(Error::Unauthorized)?;
    OwnerId::parse(principal).map_err(|e| {
        tracing::debug!(error = %e, "rejected principal");
        Error::Unauthorized
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
