//! Main entry point for the maitre CLI.
//!
//! This is the command-line interface for the maitre seating allocator.
//! It provides commands for running a dining room's bookings:
//! - `layout`: Describe the tables and which of them can be pushed together
//! - `find` / `reserve`: Allocate and book tables for a party
//! - `allocate-pending`: Seat the queued backlog
//! - `override` / `status`: Operator changes to a booking

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    let _logger = maitre::init_logger(cli.verbose, cli.quiet);

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        data_dir: cli.data_dir,
        busy_timeout: cli.busy_timeout,
        disable_autoinit: cli.disable_autoinit,
    };

    let result = match cli.command {
        cli::Command::Init(cmd) => cmd.execute(&global),
        cli::Command::Layout(cmd) => cmd.execute(&global),
        cli::Command::Table(cmd) => cmd.execute(&global),
        cli::Command::Find(cmd) => cmd.execute(&global),
        cli::Command::Reserve(cmd) => cmd.execute(&global),
        cli::Command::AllocatePending(cmd) => cmd.execute(&global),
        cli::Command::Override(cmd) => cmd.execute(&global),
        cli::Command::Status(cmd) => cmd.execute(&global),
        cli::Command::List(cmd) => cmd.execute(&global),
        cli::Command::Log(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
