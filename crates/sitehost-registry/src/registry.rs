use crate::error::Result;
use crate::id::{OwnerId, SiteId};
use crate::site::Site;

/// Persistence for site metadata.
///
/// Lookups are owner-scoped: a site owned by someone else is
/// indistinguishable from one that does not exist.
pub trait SiteRegistry: Send + Sync {
    /// Persist a new site with a freshly generated id.
    fn create(&self, owner: &OwnerId, name: &str) -> Result<Site>;

    /// All sites of `owner`, newest first.
    fn list(&self, owner: &OwnerId) -> Result<Vec<Site>>;

    fn find(&self, owner: &OwnerId, id: &SiteId) -> Result<Option<Site>>;
}
