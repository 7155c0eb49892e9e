//! TimeTracker CLI - Jira work-log synchronization.
//!
//! Provides commands for:
//! - `authorize`: Run the interactive OAuth handshake for a tracker
//! - `sync`: Push pending time entries to a tracker as worklogs
//! - `revoke`: Opt a pairing out of synchronization

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AuthorizeArgs, RevokeArgs, SyncArgs};
use output::Output;

/// TimeTracker - Jira work-log synchronization.
#[derive(Parser)]
#[command(name = "tt", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive OAuth authorization for a tracker.
    Authorize(AuthorizeArgs),
    /// Synchronize pending entries to a tracker.
    Sync(SyncArgs),
    /// Stop synchronizing a tracker for the configured user.
    Revoke(RevokeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let verbose = matches!(&cli.command, Commands::Sync(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Authorize(args) => args.execute(),
        Commands::Sync(args) => args.execute(),
        Commands::Revoke(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
