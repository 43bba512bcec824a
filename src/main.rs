// TokenVault: Application Entry Point
//
// Parses CLI arguments, initializes structured logging (passwords and tokens
// are never logged), and dispatches to the command handler.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tokenvault::cli::{execute, Cli};
use tokenvault::config::DEFAULT_LOG_FILTER;

fn main() {
    // RUST_LOG=tokenvault=debug shows why individual tokens were rejected.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = execute(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
