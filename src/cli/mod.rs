//! CLI routing and command dispatch.

use crate::core::paths::GatePaths;
use crate::models::policy::PolicySection;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::warn;

pub mod doctor;
pub mod init;
pub mod password;

/// Shared context passed to all command handlers.
pub struct CliContext {
    pub paths: GatePaths,
    pub non_interactive: bool,
    pub policy: PolicySection,
    pub config_load_warning: Option<String>,
}

#[derive(Parser, Debug)]
#[command(name = "apipasswd", version, about = "Manage the admin API password of a service data directory")]
pub struct Cli {
    /// Service data directory holding the apipasswd file
    #[arg(long, global = true, value_name = "PATH", env = "APIPASSWD_ROOT")]
    pub root: Option<PathBuf>,

    /// Run in non-interactive mode (no prompts, suitable for automation)
    #[arg(long, global = true, env = "APIPASSWD_NON_INTERACTIVE")]
    pub non_interactive: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let paths = GatePaths::resolve(self.root);

        // Best-effort: an unreadable config only loses the policy.
        let mut config_load_warning: Option<String> = None;
        let policy = match crate::core::config::load(&paths.config_file) {
            Ok(file) => file.policy,
            Err(e) => {
                let msg = format!("cannot read config: {:#}", e);
                warn!("{}", msg);
                config_load_warning = Some(msg);
                PolicySection::default()
            }
        };

        let ctx = CliContext {
            paths,
            non_interactive: self.non_interactive,
            policy,
            config_load_warning,
        };

        match self.command {
            Commands::Init(args) => init::run(&ctx, args),
            Commands::Status => password::run_status(&ctx),
            Commands::Set(args) => password::run_set(&ctx, args),
            Commands::Clear(args) => password::run_clear(&ctx, args),
            Commands::Verify(args) => password::run_verify(&ctx, args),
            Commands::Doctor => doctor::run(&ctx),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data directory and a default apipasswd.toml
    Init(init::InitArgs),
    /// Show whether an admin password is configured
    Status,
    /// Set or change the admin password
    Set(password::SetArgs),
    /// Remove the admin password
    Clear(password::ClearArgs),
    /// Check a password against the stored one
    Verify(password::VerifyArgs),
    /// Diagnose the data directory and credential file (read-only)
    Doctor,
}
