//! Error types surfaced by the credential store.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of an authenticate or change-password call.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong password, missing password, or no password configured.
    /// Carries no detail.
    #[error("unauthorized")]
    Unauthorized,

    /// Reading, writing or deleting the credential file failed.
    #[error("unable to {action} password file {}: {source}", .path.display())]
    Storage {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Another process owns the data directory's lock file.
    #[error("{} is held by another process", .path.display())]
    Locked { path: PathBuf },
}

impl AuthError {
    pub(crate) fn storage(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
