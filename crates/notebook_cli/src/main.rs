//! `notebook` process entry.
//!
//! # Responsibility
//! - Load `.env`, parse arguments, and start logging before any command.
//! - Serve the HTTP API or run one tree-editor command, against the
//!   database file or a running server.

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use log::error;
use notebook_core::{default_log_level, init_logging, init_stderr_logging};
use std::process;

fn main() {
    // Optional; a missing .env is not an error.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(err) = start_logging(&cli) {
        eprintln!("Failed to initialize logging: {err}");
        process::exit(2);
    }

    if let Err(err) = commands::execute(cli) {
        error!("event=cli_exit module=cli status=error error={err:#}");
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

/// Files when a log directory is configured, otherwise stderr. Local
/// commands default to `warn` so event lines do not bury their output.
fn start_logging(cli: &Cli) -> Result<(), String> {
    let level = match (&cli.log_level, cli.command.is_interactive()) {
        (Some(level), _) => level.as_str(),
        (None, true) => "warn",
        (None, false) => default_log_level(),
    };

    match &cli.log_dir {
        Some(dir) => init_logging(level, dir),
        None => init_stderr_logging(level),
    }
}
