//! Read-only diagnostics for a data directory.

use crate::cli::CliContext;
use crate::constants;
use crate::models::credential::CredentialRecord;
use crate::util::fs as gate_fs;
use anyhow::{bail, Result};
use std::fs;

#[derive(Debug, Default)]
struct Tally {
    ok: u32,
    warn: u32,
    fail: u32,
}

impl Tally {
    fn pass(&mut self, msg: String) {
        println!("  [PASS] {}", msg);
        self.ok += 1;
    }

    fn warn(&mut self, msg: String) {
        println!("  [WARN] {}", msg);
        self.warn += 1;
    }

    fn fail(&mut self, msg: String) {
        println!("  [FAIL] {}", msg);
        self.fail += 1;
    }
}

pub fn run(ctx: &CliContext) -> Result<()> {
    let paths = &ctx.paths;
    let mut tally = Tally::default();

    println!("Doctor: {}", paths);
    match &ctx.config_load_warning {
        Some(w) => tally.warn(w.clone()),
        None => tally.pass("config readable".to_string()),
    }

    if !paths.root.is_dir() {
        tally.fail(format!("data directory missing: {}", paths.root.display()));
        return finish(tally);
    }
    tally.pass(format!("data directory exists: {}", paths.root.display()));

    if !paths.passwd_file.exists() {
        tally.warn("no password set; the admin interface is unauthenticated".to_string());
        return finish(tally);
    }

    match gate_fs::mode_of(&paths.passwd_file)? {
        Some(mode) if mode & 0o077 != 0 => tally.warn(format!(
            "password file mode {:04o} (expected {:04o})",
            mode,
            constants::PASSWD_FILE_MODE
        )),
        Some(mode) => tally.pass(format!("password file mode ok: {:04o}", mode)),
        None => {}
    }

    match fs::read(&paths.passwd_file) {
        Ok(bytes) => match String::from_utf8(bytes)
            .map_err(|_| "not valid UTF-8".to_string())
            .and_then(|s| CredentialRecord::parse(&s).map_err(|e| e.to_string()))
        {
            Ok(_) => tally.pass("password file parses".to_string()),
            Err(e) => tally.fail(format!(
                "password file is corrupt ({}); the service will treat it as unset",
                e
            )),
        },
        Err(e) => tally.fail(format!("cannot read password file: {}", e)),
    }

    finish(tally)
}

fn finish(tally: Tally) -> Result<()> {
    println!(
        "\n{} passed, {} warnings, {} failed",
        tally.ok, tally.warn, tally.fail
    );
    if tally.fail > 0 {
        bail!("doctor found {} problem(s)", tally.fail);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::credstore::CredentialStore;
    use crate::core::paths::GatePaths;
    use crate::models::policy::PolicySection;
    use tempfile::TempDir;

    fn ctx_for(root: std::path::PathBuf) -> CliContext {
        CliContext {
            paths: GatePaths::from_root(root),
            non_interactive: true,
            policy: PolicySection::default(),
            config_load_warning: None,
        }
    }

    #[test]
    fn test_missing_root_fails() {
        let dir = TempDir::new().unwrap();
        assert!(run(&ctx_for(dir.path().join("nope"))).is_err());
    }

    #[test]
    fn test_unset_is_warning_only() {
        let dir = TempDir::new().unwrap();
        run(&ctx_for(dir.path().to_path_buf())).unwrap();
    }

    #[test]
    fn test_valid_file_passes() {
        let dir = TempDir::new().unwrap();
        let ctx = ctx_for(dir.path().to_path_buf());
        let mut store = CredentialStore::open(&ctx.paths.passwd_file).unwrap();
        store.change_password(None, Some("pw")).unwrap();
        run(&ctx).unwrap();
    }

    #[test]
    fn test_corrupt_file_fails() {
        let dir = TempDir::new().unwrap();
        let ctx = ctx_for(dir.path().to_path_buf());
        fs::write(&ctx.paths.passwd_file, "a:b:c\n").unwrap();
        assert!(run(&ctx).is_err());
    }
}
