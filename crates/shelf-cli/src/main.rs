use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing::Level;

use shelf_sdk::LibraryError;

mod cli;
mod commands;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match commands::run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<LibraryError>() {
                Some(e) if e.is_warning() => eprintln!("{} {e}", "warning:".yellow().bold()),
                _ => eprintln!("{} {err:#}", "error:".red().bold()),
            }
            ExitCode::FAILURE
        }
    }
}
