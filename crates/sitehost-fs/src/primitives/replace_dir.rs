use crate::{Error, Result};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Deletes the displaced tree once the new one is in place.
pub type RemoveFn = fn(&Path) -> io::Result<()>;

#[derive(Clone, Copy)]
pub struct ReplaceDirOptions {
    pub retry_count: u32,
    pub retry_delay: Duration,
    remove: RemoveFn,
}

impl Default for ReplaceDirOptions {
    fn default() -> Self {
        Self {
            retry_count: 5,
            retry_delay: Duration::from_millis(100),
            remove: remove_tree,
        }
    }
}

impl fmt::Debug for ReplaceDirOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplaceDirOptions")
            .field("retry_count", &self.retry_count)
            .field("retry_delay", &self.retry_delay)
            .finish_non_exhaustive()
    }
}

impl ReplaceDirOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace `remove_dir_all` for the displaced tree.
    pub fn remove_with(mut self, remove: RemoveFn) -> Self {
        self.remove = remove;
        self
    }
}

/// Outcome of a successful [`replace_dir`].
#[derive(Debug, Default)]
pub struct Replacement {
    /// The previous tree, moved aside, could not be deleted.
    pub leftover: Option<Leftover>,
}

/// A displaced directory that survived cleanup.
#[derive(Debug)]
pub struct Leftover {
    pub path: PathBuf,
    pub error: io::Error,
}

/// Swap `src` into place at `dest`.
///
/// An existing `dest` is first renamed to a hidden sibling, then `src` is
/// renamed onto `dest`, then the displaced tree is deleted. A reader of
/// `dest` sees the old tree or the new one, never a mix, though `dest` is
/// briefly absent between the two renames. If the second rename fails the
/// old tree is moved back. Deleting the displaced tree is the only
/// step allowed to fail after the swap; that failure is returned as
/// [`Replacement::leftover`] rather than as an error.
///
/// `src` and `dest` must live on the same filesystem.
pub fn replace_dir(
    src: impl AsRef<Path>,
    dest: impl AsRef<Path>,
    options: ReplaceDirOptions,
) -> Result<Replacement> {
    let src = src.as_ref();
    let dest = dest.as_ref();

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        crate::ensure_dir(parent)?;
    }

    let displaced = if dest.symlink_metadata().is_ok() {
        let aside = aside_path(dest);
        rename_with_retry(dest, &aside, &options)?;
        Some(aside)
    } else {
        None
    };

    if let Err(err) = rename_with_retry(src, dest, &options) {
        if let Some(aside) = &displaced {
            if let Err(restore) = std::fs::rename(aside, dest) {
                tracing::error!(
                    path = %dest.display(),
                    aside = %aside.display(),
                    error = %restore,
                    "failed to restore displaced directory"
                );
            }
        }
        return Err(err);
    }

    let leftover = displaced.and_then(|aside| match (options.remove)(&aside) {
        Ok(()) => None,
        Err(error) => {
            tracing::warn!(
                path = %aside.display(),
                %error,
                "failed to remove displaced directory"
            );
            Some(Leftover { path: aside, error })
        }
    });

    Ok(Replacement { leftover })
}

fn remove_tree(path: &Path) -> io::Result<()> {
    std::fs::remove_dir_all(path)
}

fn aside_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dest.with_file_name(format!(".{name}.{}.old", uuid::Uuid::new_v4().simple()))
}

fn rename_with_retry(from: &Path, to: &Path, options: &ReplaceDirOptions) -> Result<()> {
    let mut attempts = 0;
    loop {
        match std::fs::rename(from, to) {
            Ok(()) => return Ok(()),
            Err(source) if is_transient(&source) => {
                attempts += 1;
                if attempts >= options.retry_count {
                    return Err(Error::RetryLimitExceeded {
                        path: to.to_path_buf(),
                        source,
                    });
                }
                thread::sleep(options.retry_delay * attempts);
            }
            Err(source) => {
                return Err(Error::ReplaceDir {
                    path: to.to_path_buf(),
                    source,
                });
            }
        }
    }
}

// Windows reports a sharing violation as PermissionDenied while a scanner or
// indexer briefly holds a handle inside the tree.
fn is_transient(err: &io::Error) -> bool {
    cfg!(windows) && err.kind() == io::ErrorKind::PermissionDenied
}
