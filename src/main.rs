//! Unified bcr CLI.
//!
//! - `bcr server` - Run the account service
//! - `bcr auth` - Manage accounts directly in an SQL store
//!
//! Each subcommand can also be run as a standalone binary.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// bcr unified CLI.
#[derive(Parser)]
#[command(
    name = "bcr",
    version,
    about = "Account service with cache-aside credential checks and signed session tokens",
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the account server.
    #[command(name = "server", alias = "serve")]
    Server(Box<bcr_server::ServerArgs>),

    /// Manage accounts (SQL backend).
    #[cfg(feature = "cli")]
    #[command(name = "auth")]
    Auth(bcr_auth::AuthArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Server(args) => bcr_server::cli::run(*args).await,
        #[cfg(feature = "cli")]
        Commands::Auth(args) => bcr_auth::cli::run(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
