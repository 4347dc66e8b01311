//! Password storage and verification for the administrative interface.
//!
//! A `CredentialStore` owns one credential file and the record loaded from
//! it. The file is read once in [`CredentialStore::open`] and rewritten on
//! every successful [`CredentialStore::change_password`]. Callers must
//! serialize access; see `service::gate::AdminGate`.

use crate::constants;
use crate::core::hashing;
use crate::error::{AuthError, Result};
use crate::models::credential::CredentialRecord;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

pub struct CredentialStore {
    path: PathBuf,
    record: CredentialRecord,
}

impl CredentialStore {
    /// Load the credential file at `path`.
    ///
    /// A missing file means no password is configured. A file that exists
    /// but is malformed is logged and also treated as unset. Any other
    /// read failure is returned.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let record = load_record(&path)?;
        Ok(Self { path, record })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_password_set(&self) -> bool {
        self.record.is_set()
    }

    /// Succeeds only if a password is set and `candidate` matches it.
    pub fn authenticate(&self, candidate: Option<&str>) -> Result<()> {
        if self.is_valid(candidate) {
            Ok(())
        } else {
            Err(AuthError::Unauthorized)
        }
    }

    /// Set, rotate or clear the password.
    ///
    /// When a password is set, `old` must match it. A non-empty `new`
    /// installs a fresh salt and digest; an empty or absent `new` removes the
    /// credential file. Disk is updated before memory, so a storage error
    /// leaves the store as it was.
    pub fn change_password(&mut self, old: Option<&str>, new: Option<&str>) -> Result<()> {
        if self.record.is_set() && !self.is_valid(old) {
            return Err(AuthError::Unauthorized);
        }

        match new.filter(|p| !p.is_empty()) {
            Some(password) => {
                let salt = hashing::generate_salt();
                let digest = hashing::salted_digest(password, &salt);
                let record = CredentialRecord::Set { salt, digest };
                self.write_record(&record)?;
                let rotated = self.record.is_set();
                self.record = record;
                if rotated {
                    info!(path = %self.path.display(), "api password changed");
                } else {
                    info!(path = %self.path.display(), "api password set");
                }
            }
            None => {
                self.remove_file()?;
                if self.record.is_set() {
                    info!(path = %self.path.display(), "api password cleared");
                }
                self.record = CredentialRecord::Unset;
            }
        }
        Ok(())
    }

    fn is_valid(&self, candidate: Option<&str>) -> bool {
        let (Some(candidate), CredentialRecord::Set { salt, digest }) = (candidate, &self.record)
        else {
            return false;
        };
        hashing::digests_match(digest, &hashing::salted_digest(candidate, salt))
    }

    fn write_record(&self, record: &CredentialRecord) -> Result<()> {
        let Some(line) = record.to_line() else {
            return Ok(());
        };
        write_atomically(&self.path, &line).map_err(|e| AuthError::storage("write", &self.path, e))
    }

    fn remove_file(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::storage("remove", &self.path, e)),
        }
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("path", &self.path)
            .field("password_set", &self.record.is_set())
            .finish()
    }
}

fn load_record(path: &Path) -> Result<CredentialRecord> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no api password file");
            return Ok(CredentialRecord::Unset);
        }
        Err(e) => return Err(AuthError::storage("read", path, e)),
    };

    let Ok(contents) = String::from_utf8(bytes) else {
        warn!(path = %path.display(), "api password file is corrupt: not valid UTF-8");
        return Ok(CredentialRecord::Unset);
    };

    match CredentialRecord::parse(&contents) {
        Ok(record) => {
            debug!(path = %path.display(), "api password loaded");
            Ok(record)
        }
        Err(e) => {
            warn!(path = %path.display(), "api password file is corrupt: {}", e);
            Ok(CredentialRecord::Unset)
        }
    }
}

/// Write `line` plus a newline to a temp file beside `path`, then rename.
fn write_atomically(path: &Path, line: &str) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    writeln!(tmp, "{}", line)?;
    tmp.as_file().sync_all()?;

    #[cfg(unix)]
    tmp.as_file()
        .set_permissions(fs::Permissions::from_mode(constants::PASSWD_FILE_MODE))?;

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> CredentialStore {
        CredentialStore::open(dir.path().join(constants::PASSWD_FILE_NAME)).unwrap()
    }

    #[test]
    fn test_missing_file_is_unset() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(!store.is_password_set());
        assert!(store.authenticate(Some("")).unwrap_err().is_unauthorized());
        assert!(store.authenticate(None).unwrap_err().is_unauthorized());
    }

    #[test]
    fn test_set_then_authenticate() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.change_password(None, Some("hunter2")).unwrap();
        assert!(store.is_password_set());
        store.authenticate(Some("hunter2")).unwrap();
        assert!(store.authenticate(Some("hunter2x")).is_err());
        assert!(store.authenticate(None).is_err());
    }

    #[test]
    fn test_first_set_ignores_old_password() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.change_password(Some("anything"), Some("first")).unwrap();
        store.authenticate(Some("first")).unwrap();
    }

    #[test]
    fn test_clear_when_unset_is_noop() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.change_password(None, Some("")).unwrap();
        store.change_password(None, None).unwrap();
        assert!(!store.is_password_set());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_wrong_old_password_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.change_password(None, Some("one")).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        let err = store.change_password(Some("nope"), Some("two")).unwrap_err();
        assert!(err.is_unauthorized());
        let err = store.change_password(None, None).unwrap_err();
        assert!(err.is_unauthorized());

        store.authenticate(Some("one")).unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn test_file_format() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.change_password(None, Some("secret")).unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        assert!(contents.ends_with('\n'));
        assert_eq!(contents.lines().count(), 1);
        let (salt, digest) = contents.trim_end().split_once(':').unwrap();
        assert!(salt.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(digest.len(), 44);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_mode_is_private() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.change_password(None, Some("secret")).unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, constants::PASSWD_FILE_MODE);
    }

    #[test]
    fn test_reads_record_written_elsewhere() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(constants::PASSWD_FILE_NAME);
        let digest = hashing::salted_digest("legacy", "-8131744239475640281");
        let record = CredentialRecord::Set {
            salt: "-8131744239475640281".into(),
            digest,
        };
        fs::write(&path, format!("{}\n", record.to_line().unwrap())).unwrap();

        let store = CredentialStore::open(&path).unwrap();
        store.authenticate(Some("legacy")).unwrap();
    }

    #[test]
    fn test_corrupt_file_loads_unset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(constants::PASSWD_FILE_NAME);
        for contents in ["", "1:AAEC:AAEC\n", "1:AAEC\n2:AAEC\n", "nocolon\n"] {
            fs::write(&path, contents).unwrap();
            let store = CredentialStore::open(&path).unwrap();
            assert!(!store.is_password_set(), "contents {:?}", contents);
        }
    }

    #[test]
    fn test_non_utf8_file_loads_unset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(constants::PASSWD_FILE_NAME);
        fs::write(&path, [0xff, 0xfe, b':', b'A']).unwrap();
        assert!(!CredentialStore::open(&path).unwrap().is_password_set());
    }

    #[test]
    fn test_unreadable_path_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = CredentialStore::open(dir.path()).unwrap_err();
        assert!(matches!(err, AuthError::Storage { action: "read", .. }));
    }

    #[test]
    fn test_write_failure_keeps_previous_state() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data");
        fs::create_dir(&data).unwrap();
        let mut store = CredentialStore::open(data.join(constants::PASSWD_FILE_NAME)).unwrap();
        store.change_password(None, Some("kept")).unwrap();

        fs::remove_dir_all(&data).unwrap();
        let err = store.change_password(Some("kept"), Some("lost")).unwrap_err();
        assert!(matches!(err, AuthError::Storage { action: "write", .. }));
        store.authenticate(Some("kept")).unwrap();
        assert!(store.authenticate(Some("lost")).is_err());
    }

    #[test]
    fn test_remove_failure_keeps_password_set() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.change_password(None, Some("kept")).unwrap();

        fs::remove_file(store.path()).unwrap();
        fs::create_dir(store.path()).unwrap();
        fs::write(store.path().join("occupied"), "x").unwrap();

        let err = store.change_password(Some("kept"), None).unwrap_err();
        assert!(matches!(err, AuthError::Storage { action: "remove", .. }));
        assert!(store.is_password_set());
        store.authenticate(Some("kept")).unwrap();
    }

    #[test]
    fn test_clear_after_file_vanished() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.change_password(None, Some("gone")).unwrap();
        fs::remove_file(store.path()).unwrap();

        store.change_password(Some("gone"), None).unwrap();
        assert!(!store.is_password_set());
        assert!(!store.path().exists());
    }
}
