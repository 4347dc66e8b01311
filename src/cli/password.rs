use crate::cli::CliContext;
use crate::constants;
use crate::core::credstore::CredentialStore;
use crate::core::file_lock::StoreLock;
use crate::util::fs as gate_fs;
use anyhow::{bail, Context, Result};
use clap::Args;
use dialoguer::Password;
use std::io::{self, BufRead};
use zeroize::Zeroizing;

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Read the current password (only when one is set) and the new
    /// password from stdin, one per line
    #[arg(long)]
    pub from_stdin: bool,
}

#[derive(Args, Debug)]
pub struct ClearArgs {
    /// Read the current password from stdin
    #[arg(long)]
    pub from_stdin: bool,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Read the candidate password from stdin
    #[arg(long)]
    pub from_stdin: bool,
}

pub fn run_status(ctx: &CliContext) -> Result<()> {
    let store = CredentialStore::open(&ctx.paths.passwd_file)?;
    let state = if store.is_password_set() { "set" } else { "not set" };
    println!("password: {}", state);
    println!("file:     {}", store.path().display());
    Ok(())
}

pub fn run_set(ctx: &CliContext, args: SetArgs) -> Result<()> {
    require_input_mode(ctx, args.from_stdin)?;
    if !ctx.paths.root.exists() {
        gate_fs::ensure_dir(&ctx.paths.root, constants::DATA_DIR_MODE)?;
    }
    let _lock = StoreLock::acquire(&ctx.paths)?;
    let mut store = CredentialStore::open(&ctx.paths.passwd_file)?;

    let (old, new) = if args.from_stdin {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let old = if store.is_password_set() {
            Some(read_line_from(&mut input, "current password")?)
        } else {
            None
        };
        (old, read_line_from(&mut input, "new password")?)
    } else {
        let old = if store.is_password_set() {
            Some(prompt_password("Current password")?)
        } else {
            None
        };
        let new = Zeroizing::new(
            Password::new()
                .with_prompt("New password")
                .with_confirmation("Repeat new password", "passwords do not match")
                .interact()
                .context("read new password from prompt")?,
        );
        (old, new)
    };

    let rotated = store.is_password_set();
    apply_set(ctx, &mut store, old.as_deref().map(String::as_str), &new)?;
    if rotated {
        println!("password changed ({})", store.path().display());
    } else {
        println!("password set ({})", store.path().display());
    }
    Ok(())
}

pub fn run_clear(ctx: &CliContext, args: ClearArgs) -> Result<()> {
    require_input_mode(ctx, args.from_stdin)?;
    let _lock = StoreLock::acquire(&ctx.paths)?;
    let mut store = CredentialStore::open(&ctx.paths.passwd_file)?;
    if !store.is_password_set() {
        println!("no password set");
        return Ok(());
    }

    let old = if args.from_stdin {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        read_line_from(&mut input, "current password")?
    } else {
        prompt_password("Current password")?
    };
    store
        .change_password(Some(old.as_str()), None)
        .context("clear password")?;
    println!("password cleared");
    Ok(())
}

pub fn run_verify(ctx: &CliContext, args: VerifyArgs) -> Result<()> {
    require_input_mode(ctx, args.from_stdin)?;
    let store = CredentialStore::open(&ctx.paths.passwd_file)?;
    let candidate = if args.from_stdin {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        read_line_from(&mut input, "password")?
    } else {
        prompt_password("Password")?
    };
    store.authenticate(Some(candidate.as_str()))?;
    println!("ok");
    Ok(())
}

/// Validate a new password against policy and store it.
fn apply_set(
    ctx: &CliContext,
    store: &mut CredentialStore,
    old: Option<&str>,
    new: &str,
) -> Result<()> {
    if new.is_empty() {
        bail!("new password cannot be empty (use `apipasswd clear` to remove it)");
    }
    if let Err(msg) = ctx.policy.check_new_password(new) {
        bail!("{}", msg);
    }
    store
        .change_password(old, Some(new))
        .context("change password")?;
    Ok(())
}

fn require_input_mode(ctx: &CliContext, from_stdin: bool) -> Result<()> {
    if ctx.non_interactive && !from_stdin {
        bail!("--non-interactive requires --from-stdin");
    }
    Ok(())
}

fn prompt_password(prompt: &str) -> Result<Zeroizing<String>> {
    Ok(Zeroizing::new(
        Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .context("read password from prompt")?,
    ))
}

fn read_line_from(input: &mut impl BufRead, what: &str) -> Result<Zeroizing<String>> {
    let mut buf = Zeroizing::new(String::new());
    let n = input
        .read_line(&mut buf)
        .with_context(|| format!("read {} from stdin", what))?;
    if n == 0 {
        bail!("stdin closed before {} was read", what);
    }
    Ok(Zeroizing::new(buf.trim_end_matches(['\r', '\n']).to_string()))
}
