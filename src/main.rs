//! `mesa-sync` binary entry point.
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use mesa_sync::cli::{Cli, Command};
use mesa_sync::{commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    let command = args.command.unwrap_or_default();

    if command == Command::Version {
        commands::version::run();
        return Ok(());
    }

    logging::init_subscriber(args.verbose, command.name());
    let log = Arc::new(logging::Logger::new(command.name()));

    match command {
        Command::Sync => commands::sync::run(&args.global, &log),
        Command::Status => commands::status::run(&args.global, &log),
        Command::Version => Ok(()),
    }
}
