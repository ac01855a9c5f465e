//! Site records, identifiers and registry backends.
//!
//! [`OwnerId`] and [`SiteId`] are the only way an identifier reaches the
//! filesystem layer, so their constructors are where path-segment safety is
//! enforced.

pub use error::{Error, Result};
pub use id::{ALPHABET, ID_LEN, OwnerId, SiteId, generate};
pub use json::JsonRegistry;
pub use memory::MemoryRegistry;
pub use registry::SiteRegistry;
pub use site::{Site, SiteSummary};

mod error;
mod id;
mod json;
mod memory;
mod registry;
mod site;
