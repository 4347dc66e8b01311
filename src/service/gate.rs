//! Shared, serialized access to the credential store for a running service.

use crate::core::credstore::CredentialStore;
use crate::core::file_lock::StoreLock;
use crate::core::paths::GatePaths;
use crate::error::{AuthError, Result};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cloneable handle on one `CredentialStore`. Every call holds the mutex for
/// its full duration, including the disk write. The data directory's lock
/// file stays held until the last clone is dropped, so no other process can
/// rewrite the credential file underneath the service.
#[derive(Debug, Clone)]
pub struct AdminGate {
    store: Arc<Mutex<CredentialStore>>,
    _owner: Arc<StoreLock>,
}

impl AdminGate {
    /// Take ownership of a data directory and load its credential file.
    pub fn open(paths: &GatePaths) -> Result<Self> {
        let owner = match StoreLock::try_acquire(&paths.lock_file) {
            Ok(Some(lock)) => lock,
            Ok(None) => {
                return Err(AuthError::Locked {
                    path: paths.lock_file.clone(),
                })
            }
            Err(e) => return Err(AuthError::storage("lock", &paths.lock_file, e)),
        };
        let store = CredentialStore::open(&paths.passwd_file)?;
        Ok(Self {
            store: Arc::new(Mutex::new(store)),
            _owner: Arc::new(owner),
        })
    }

    pub fn is_password_set(&self) -> bool {
        self.lock().is_password_set()
    }

    pub fn authenticate(&self, candidate: Option<&str>) -> Result<()> {
        self.lock().authenticate(candidate)
    }

    pub fn change_password(&self, old: Option<&str>, new: Option<&str>) -> Result<()> {
        self.lock().change_password(old, new)
    }

    /// Per-request check: open while no password is configured, otherwise
    /// `candidate` must match.
    pub fn admit(&self, candidate: Option<&str>) -> Result<()> {
        let store = self.lock();
        if !store.is_password_set() {
            return Ok(());
        }
        store.authenticate(candidate)
    }

    // The record is only replaced after a successful disk operation.
    fn lock(&self) -> MutexGuard<'_, CredentialStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
