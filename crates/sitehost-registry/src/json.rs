use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sitehost_fs::{AtomicWriteOptions, atomic_read, atomic_write, ensure_dir};

use crate::error::{Error, Result};
use crate::id::{OwnerId, SiteId, generate};
use crate::memory::MAX_ID_ATTEMPTS;
use crate::registry::SiteRegistry;
use crate::site::{Site, newest_first};

const FORMAT_VERSION: u32 = 1;

#[derive(Deserialize)]
struct RegistryFile {
    version: u32,
    sites: Vec<Site>,
}

/// Registry persisted as a single JSON document.
///
/// Every mutation rewrites the whole file with an atomic replace, so a crash
/// leaves either the previous or the new document on disk.
#[derive(Debug)]
pub struct JsonRegistry {
    path: PathBuf,
    sites: Mutex<Vec<Site>>,
}

impl JsonRegistry {
    /// Open the registry at `path`. A missing file is an empty registry.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let sites = match atomic_read(&path) {
            Ok(bytes) => {
                let file: RegistryFile = serde_json::from_slice(&bytes).map_err(|source| {
                    Error::Corrupt {
                        path: path.clone(),
                        source,
                    }
                })?;
                if file.version > FORMAT_VERSION {
                    return Err(Error::UnsupportedVersion {
                        path,
                        version: file.version,
                    });
                }
                file.sites
            }
            Err(sitehost_fs::Error::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), sites = sites.len(), "registry opened");
        Ok(Self {
            path,
            sites: Mutex::new(sites),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, sites: &[Site]) -> Result<()> {
        let document = serde_json::to_vec_pretty(&RegistryFileRef {
            version: FORMAT_VERSION,
            sites,
        })
        .map_err(Error::Serialize)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir(parent)?;
        }
        atomic_write(&self.path, &document, AtomicWriteOptions::default())?;
        Ok(())
    }
}

#[derive(Serialize)]
struct RegistryFileRef<'a> {
    version: u32,
    sites: &'a [Site],
}

impl SiteRegistry for JsonRegistry {
    fn create(&self, owner: &OwnerId, name: &str) -> Result<Site> {
        let mut sites = self.sites.lock().map_err(|_| Error::Poisoned)?;

        let id = (0..MAX_ID_ATTEMPTS)
            .map(|_| generate())
            .find(|candidate| sites.iter().all(|site| site.id != *candidate))
            .ok_or(Error::IdExhausted {
                attempts: MAX_ID_ATTEMPTS,
            })?;

        let site = Site {
            id,
            owner_id: owner.clone(),
            name: name.to_string(),
            created_at: Utc::now(),
        };

        sites.push(site.clone());
        if let Err(e) = self.persist(&sites) {
            sites.pop();
            return Err(e);
        }
        Ok(site)
    }

    fn list(&self, owner: &OwnerId) -> Result<Vec<Site>> {
        let sites = self.sites.lock().map_err(|_| Error::Poisoned)?;
        let owned = sites
            .iter()
            .enumerate()
            .filter(|(_, site)| site.owner_id == *owner)
            .map(|(seq, site)| (seq as u64, site.clone()))
            .collect();
        Ok(newest_first(owned))
    }

    fn find(&self, owner: &OwnerId, id: &SiteId) -> Result<Option<Site>> {
        let sites = self.sites.lock().map_err(|_| Error::Poisoned)?;
        Ok(sites
            .iter()
            .find(|site| site.id == *id && site.owner_id == *owner)
            .cloned())
    }
}
