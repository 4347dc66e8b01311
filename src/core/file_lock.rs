//! Advisory flock(2) guard giving one owner at a time to a data directory.
//!
//! A running service holds it for as long as its `AdminGate` lives; the CLI
//! holds it for the duration of `set` or `clear`.

use crate::core::paths::GatePaths;
use anyhow::{bail, Context, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// Exclusive lock on `apipasswd.lock`. Released on drop.
#[derive(Debug)]
pub struct StoreLock {
    _file: File,
}

impl StoreLock {
    /// Take the lock for `paths`, failing immediately if another process
    /// holds it.
    pub fn acquire(paths: &GatePaths) -> Result<Self> {
        let lock = Self::try_acquire(&paths.lock_file)
            .with_context(|| format!("lock {}", paths.lock_file.display()))?;
        match lock {
            Some(lock) => Ok(lock),
            None => bail!(
                "{} is in use by a running service or another apipasswd process",
                paths.root.display()
            ),
        }
    }

    /// Returns `Ok(None)` if the lock is already held.
    pub fn try_acquire(path: &Path) -> io::Result<Option<Self>> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self { _file: file })),
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            // fs2 on Linux may report EAGAIN as Other
            Err(ref e) if e.raw_os_error() == Some(11) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_second_acquire_fails_while_held() {
        let dir = TempDir::new().unwrap();
        let paths = GatePaths::from_root(dir.path().to_path_buf());
        let _lock = StoreLock::acquire(&paths).unwrap();
        assert!(paths.lock_file.exists());
        assert!(StoreLock::try_acquire(&paths.lock_file).unwrap().is_none());
        assert!(StoreLock::acquire(&paths).is_err());
    }

    #[test]
    fn test_released_on_drop() {
        let dir = TempDir::new().unwrap();
        let paths = GatePaths::from_root(dir.path().to_path_buf());
        drop(StoreLock::acquire(&paths).unwrap());
        assert!(StoreLock::try_acquire(&paths.lock_file).unwrap().is_some());
    }
}
