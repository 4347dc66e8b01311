//! Data directory resolution and the files inside it.

use crate::constants;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct GatePaths {
    pub root: PathBuf,
    pub passwd_file: PathBuf,
    pub config_file: PathBuf,
    pub lock_file: PathBuf,
}

impl GatePaths {
    /// Resolve the data directory from CLI arg, env var, or the default.
    pub fn resolve(root_arg: Option<PathBuf>) -> Self {
        if let Some(root) = root_arg {
            return Self::from_root(root);
        }
        match env::var(constants::ROOT_ENV_VAR) {
            Ok(root) if !root.is_empty() => Self::from_root(PathBuf::from(root)),
            _ => Self::from_root(PathBuf::from(constants::DEFAULT_DATA_ROOT)),
        }
    }

    /// Create gate paths from a data directory.
    pub fn from_root(root: PathBuf) -> Self {
        let passwd_file = root.join(constants::PASSWD_FILE_NAME);
        let config_file = root.join(constants::CONFIG_FILE_NAME);
        let lock_file = root.join(constants::LOCK_FILE_NAME);
        Self {
            root,
            passwd_file,
            config_file,
            lock_file,
        }
    }
}

impl std::fmt::Display for GatePaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "apipasswd@{}", self.root.display())
    }
}
