//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    AllocatePendingCommand, CompletionsCommand, FindCommand, InitCommand, LayoutCommand,
    ListCommand, LogCommand, OverrideCommand, ReserveCommand, StatusCommand, TableCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for seating restaurant reservations.
#[derive(Parser)]
#[command(name = "maitre")]
#[command(version, about = "Allocate restaurant tables to reservations", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "MAITRE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "MAITRE_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization
    #[arg(long, global = true, env = "MAITRE_DISABLE_AUTOINIT")]
    pub disable_autoinit: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the data directory and database
    Init(InitCommand),

    /// Import a floor plan or list tables and joins
    Layout(LayoutCommand),

    /// Enable or disable a table
    Table(TableCommand),

    /// Show the best tables for a party without booking
    Find(FindCommand),

    /// Book tables for a party
    Reserve(ReserveCommand),

    /// Assign tables to pending reservations, oldest first
    AllocatePending(AllocatePendingCommand),

    /// Reassign a reservation to specific tables
    Override(OverrideCommand),

    /// Change a reservation's status
    Status(StatusCommand),

    /// List reservations
    List(ListCommand),

    /// Show a reservation's audit trail
    Log(LogCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
