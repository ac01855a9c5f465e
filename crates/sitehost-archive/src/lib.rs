//! Zip extraction with path sanitization and staged replacement.
//!
//! # Architecture
//!
//! - `sanitize.rs` - Entry name normalization (zip-slip prevention)
//! - `options.rs` - Prefix stripping, entry filtering, size limits
//! - `extract.rs` - Two-pass extraction: validate every entry, then write
//! - `entry.rs` - Entry listing and extraction report
//! - `workspace.rs` - Extraction into a staging directory with atomic commit

pub use entry::{ArchiveEntry, ExtractReport, ExtractedEntry, list_entries};
pub use error::{Error, Result};
pub use extract::extract;
pub use options::ExtractOptions;
pub use sanitize::{SanitizedPath, normalize_entry_name, sanitize_entry};
pub use workspace::{Committed, StagedExtraction, extract_staged};

mod entry;
mod error;
mod extract;
pub mod options;
mod sanitize;
mod workspace;
