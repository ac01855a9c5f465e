use std::sync::Arc;

use dashmap::DashMap;
use sitehost_registry::{OwnerId, SiteId};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per site directory.
///
/// A deploy holds the guard from staging until the swap is done, so at most
/// one mutation per site is in flight. Entries are never removed; the table
/// grows with the number of distinct sites ever deployed.
#[derive(Debug, Default)]
pub struct SiteLocks {
    locks: DashMap<(OwnerId, SiteId), Arc<Mutex<()>>>,
}

impl SiteLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, owner: &OwnerId, site: &SiteId) -> OwnedMutexGuard<()> {
        // Clone the Arc out so no shard lock is held across the await.
        let lock = self
            .locks
            .entry((owner.clone(), site.clone()))
            .or_default()
            .clone();
        lock.lock_owned().await
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
