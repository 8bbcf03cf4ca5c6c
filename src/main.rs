// Author: Dustin Pilgrim
// License: MIT

mod app;
mod cli;
mod config;
mod core;
mod daemon;
mod ipc;
mod log;
mod services;

use clap::Parser;

type AnyError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    let args = cli::Args::parse();

    // A subcommand makes us a control client for a running perch daemon;
    // bare `perch` runs the daemon itself.
    match args.command {
        Some(_) => app::command::run(args).await,
        None => app::daemon_mode::run(args).await,
    }
}
