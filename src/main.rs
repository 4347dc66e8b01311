use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // RUST_LOG=apipasswd=debug for verbose output. Passwords are never logged.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("apipasswd=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = apipasswd::cli::Cli::parse();
    cli.run()
}
