//! Filesystem primitives for site content directories.
//!
//! - `primitives/` - directory ensure, atomic file write, atomic directory replacement
//! - `workspace.rs` - staging directory that is either committed over a live path or discarded

mod error;
mod primitives;
mod workspace;

pub use error::{Error, Result};
pub use primitives::{
    AtomicWriteOptions, Leftover, RemoveFn, ReplaceDirOptions, Replacement, atomic_read, atomic_write,
    ensure_dir, replace_dir,
};
pub use workspace::Workspace;
