//! Centralized constants for file names, permissions, and the record format.

/// Default data directory when neither `--root` nor `APIPASSWD_ROOT` is set.
pub const DEFAULT_DATA_ROOT: &str = "/var/lib/apipasswd";

/// Environment variable overriding the data directory.
pub const ROOT_ENV_VAR: &str = "APIPASSWD_ROOT";

/// Name of the credential file inside the data directory.
pub const PASSWD_FILE_NAME: &str = "apipasswd";

/// Name of the optional configuration file.
pub const CONFIG_FILE_NAME: &str = "apipasswd.toml";

/// Name of the advisory lock file guarding CLI mutations.
pub const LOCK_FILE_NAME: &str = "apipasswd.lock";

/// Separator between salt and encoded digest in the credential file.
pub const RECORD_SEPARATOR: char = ':';

/// Permission mode for the data directory.
pub const DATA_DIR_MODE: u32 = 0o700;

/// Permission mode for the credential file.
pub const PASSWD_FILE_MODE: u32 = 0o600;

/// Permission mode for apipasswd.toml.
pub const CONFIG_FILE_MODE: u32 = 0o640;

/// Random bytes drawn for each salt (rendered as one decimal integer).
pub const SALT_BYTES: usize = 16;

/// Length in bytes of a SHA-256 digest.
pub const DIGEST_LEN: usize = 32;
