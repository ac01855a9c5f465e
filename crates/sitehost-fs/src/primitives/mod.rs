pub mod atomic_write;
pub mod ensure_dir;
pub mod replace_dir;

pub use atomic_write::{AtomicWriteOptions, atomic_read, atomic_write};
pub use ensure_dir::ensure_dir;
pub use replace_dir::{Leftover, RemoveFn, ReplaceDirOptions, Replacement, replace_dir};
