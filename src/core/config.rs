//! Loading and saving `apipasswd.toml`.

use crate::constants;
use crate::models::gate_config::GateFile;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

pub fn load(path: &Path) -> Result<GateFile> {
    if !path.exists() {
        return Ok(GateFile::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parse config {}", path.display()))
}

pub fn save(path: &Path, file: &GateFile) -> Result<()> {
    let content = toml::to_string_pretty(file).context("serialize config")?;
    let mut tmp = tempfile::NamedTempFile::new_in(
        path.parent().unwrap_or_else(|| Path::new(".")),
    )
    .context("create temp config")?;
    tmp.write_all(content.as_bytes()).context("write config")?;
    tmp.as_file().sync_all().context("sync config")?;

    #[cfg(unix)]
    {
        let perm = fs::Permissions::from_mode(constants::CONFIG_FILE_MODE);
        tmp.as_file()
            .set_permissions(perm)
            .context("set permissions on temp config")?;
    }

    tmp.persist(path)
        .map_err(|err| anyhow::anyhow!("persist config: {}", err))?;
    Ok(())
}
