//! Build script for maitre-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
/// When adding/removing/modifying commands, update both files.
fn build_cli() -> Command {
    Command::new("maitre")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Allocate restaurant tables to reservations")
        .long_about(
            "Command-line tool for seating reservations at restaurant tables, \
             joining tables for larger parties",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Override the data directory location")
                .value_name("PATH")
                .global(true)
                .env("MAITRE_DATA_DIR"),
        )
        .arg(
            Arg::new("busy-timeout")
                .long("busy-timeout")
                .help("Override the default busy timeout (in seconds)")
                .value_name("SECONDS")
                .global(true)
                .env("MAITRE_BUSY_TIMEOUT"),
        )
        .arg(
            Arg::new("disable-autoinit")
                .long("disable-autoinit")
                .help("Disable automatic database initialization")
                .global(true)
                .action(clap::ArgAction::SetTrue)
                .env("MAITRE_DISABLE_AUTOINIT"),
        )
        .subcommands(vec![
            Command::new("init")
                .about("Initialize the data directory and database")
                .long_about("Set up the maitre database and, optionally, a configuration file"),
            Command::new("layout")
                .about("Import a floor plan or list tables and joins")
                .long_about("Add tables and configured joins from a YAML floor plan, or list them"),
            Command::new("table")
                .about("Enable or disable a table")
                .long_about("Take a table out of service, or put it back, by its number"),
            Command::new("find")
                .about("Show the best tables for a party without booking")
                .long_about("Run the allocation cascade for a time slot and print the choice"),
            Command::new("reserve")
                .about("Book tables for a party")
                .long_about("Allocate and book the best tables, or queue a pending reservation"),
            Command::new("allocate-pending")
                .about("Assign tables to pending reservations, oldest first")
                .long_about("Sweep the pending backlog in arrival order and seat what fits"),
            Command::new("override")
                .about("Reassign a reservation to specific tables")
                .long_about("Replace a reservation's tables with an operator's choice"),
            Command::new("status")
                .about("Change a reservation's status")
                .long_about("Move a reservation to pending, confirmed, seated, completed or cancelled"),
            Command::new("list")
                .about("List reservations")
                .long_about("Display a day's reservations, or the pending backlog, in various formats"),
            Command::new("log")
                .about("Show a reservation's audit trail")
                .long_about("Display every recorded change to a reservation, oldest first"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let app = build_cli();
    let man = Man::new(app);
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("maitre.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
