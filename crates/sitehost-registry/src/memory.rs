use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::error::{Error, Result};
use crate::id::{OwnerId, SiteId, generate};
use crate::registry::SiteRegistry;
use crate::site::{Site, newest_first};

pub(crate) const MAX_ID_ATTEMPTS: usize = 8;

/// In-process registry. Contents are lost when it is dropped.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    sites: DashMap<SiteId, (u64, Site)>,
    seq: AtomicU64,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

impl SiteRegistry for MemoryRegistry {
    fn create(&self, owner: &OwnerId, name: &str) -> Result<Site> {
        for _ in 0..MAX_ID_ATTEMPTS {
            if let Entry::Vacant(slot) = self.sites.entry(generate()) {
                let site = Site {
                    id: slot.key().clone(),
                    owner_id: owner.clone(),
                    name: name.to_string(),
                    created_at: Utc::now(),
                };
                let seq = self.seq.fetch_add(1, Ordering::Relaxed);
                slot.insert((seq, site.clone()));
                return Ok(site);
            }
        }
        Err(Error::IdExhausted {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    fn list(&self, owner: &OwnerId) -> Result<Vec<Site>> {
        let owned = self
            .sites
            .iter()
            .filter(|entry| entry.value().1.owner_id == *owner)
            .map(|entry| entry.value().clone())
            .collect();
        Ok(newest_first(owned))
    }

    fn find(&self, owner: &OwnerId, id: &SiteId) -> Result<Option<Site>> {
        Ok(self
            .sites
            .get(id)
            .map(|entry| entry.value().1.clone())
            .filter(|site| site.owner_id == *owner))
    }
}
