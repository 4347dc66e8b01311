use crate::cli::CliContext;
use crate::constants;
use crate::core::config;
use crate::util::fs as gate_fs;
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Minimum password length to record in apipasswd.toml
    #[arg(long, value_name = "N")]
    pub min_length: Option<usize>,
}

pub fn run(ctx: &CliContext, args: InitArgs) -> Result<()> {
    let paths = &ctx.paths;
    gate_fs::ensure_dir(&paths.root, constants::DATA_DIR_MODE)?;

    let mut file = config::load(&paths.config_file)?;
    if args.min_length.is_some() {
        file.policy.min_password_length = args.min_length;
    }
    if args.min_length.is_some() || !paths.config_file.exists() {
        config::save(&paths.config_file, &file)?;
    }

    println!("initialized {}", paths.root.display());
    if paths.passwd_file.exists() {
        println!("password file present: {}", paths.passwd_file.display());
    } else {
        println!("no password set (run: apipasswd set)");
    }
    Ok(())
}
