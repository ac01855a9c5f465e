use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{OwnerId, SiteId};

/// A persisted site record.
///
/// `id` and `owner_id` together determine the content directory and never
/// change after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,
    pub owner_id: OwnerId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Listing projection of a [`Site`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSummary {
    pub id: SiteId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Site> for SiteSummary {
    fn from(site: Site) -> Self {
        Self {
            id: site.id,
            name: site.name,
            created_at: site.created_at,
        }
    }
}

/// Order sites newest first. `seq` is the insertion order and breaks ties.
pub(crate) fn newest_first(mut sites: Vec<(u64, Site)>) -> Vec<Site> {
    sites.sort_by(|(seq_a, a), (seq_b, b)| {
        b.created_at.cmp(&a.created_at).then(seq_b.cmp(seq_a))
    });
    sites.into_iter().map(|(_, site)| site).collect()
}
