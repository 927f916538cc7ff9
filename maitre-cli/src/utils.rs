//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including data directory resolution, configuration loading, database
//! management, argument parsing and output formatting.

use crate::error::CliError;
use chrono::{NaiveDate, NaiveTime};
use clap::ValueEnum;
use maitre::config::OutputFormat as ConfiguredFormat;
use maitre::database::DATABASE_FILE_NAME;
use maitre::output::{JsonFormatter, OutputFormatter, TableFormatter, Tabular};
use maitre::{Config, ConfigBuilder, Database, DatabaseConfig, ReservationStatus, RestaurantId};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
#[allow(dead_code)] // Fields used via pattern matching in main.rs
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds).
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization.
    pub disable_autoinit: bool,
}

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated table format (human-readable)
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// TSV format (tab-separated values)
    Tsv,
}

impl OutputFormat {
    /// Picks the flag value, then the configured format, then `Table`.
    pub fn resolve(flag: Option<Self>, config: &Config) -> Self {
        flag.unwrap_or(match config.output_format {
            Some(ConfiguredFormat::Json) => Self::Json,
            Some(ConfiguredFormat::Csv) => Self::Csv,
            Some(ConfiguredFormat::Tsv) => Self::Tsv,
            Some(ConfiguredFormat::Table) | None => Self::Table,
        })
    }
}

/// Resolve the data directory.
///
/// Priority: `--data-dir` (or `MAITRE_DATA_DIR`) > `~/.maitre`.
pub fn resolve_data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match global.data_dir {
        Some(ref dir) => Ok(dir.clone()),
        None => maitre::database::default_data_dir()
            .map_err(|_| CliError::Config("Could not determine home directory".to_string())),
    }
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Environment variables (highest priority)
/// 2. `maitre.local.yaml` and `maitre.yaml` found from the working directory up
/// 3. `config.yaml` in the data directory
/// 4. Built-in defaults (lowest priority)
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let data_dir = resolve_data_dir(global)?;

    ConfigBuilder::new()
        .with_data_dir(&data_dir)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Open database with configuration.
///
/// # Errors
///
/// Returns `NoDataDirectory` if the database doesn't exist and auto-init is disabled.
pub fn open_database(global: &GlobalOptions, config: &Config) -> Result<Database, CliError> {
    let db_path = resolve_data_dir(global)?.join(DATABASE_FILE_NAME);
    let autoinit_disabled = global.disable_autoinit || config.disable_autoinit == Some(true);

    if !db_path.exists() && autoinit_disabled {
        return Err(CliError::NoDataDirectory);
    }

    let busy_timeout = match global.busy_timeout {
        Some(seconds) => Duration::from_secs(seconds.into()),
        None => config.lock_wait(),
    };

    Database::open(DatabaseConfig::new(db_path).with_busy_timeout(busy_timeout))
        .map_err(CliError::from)
}

/// Parse a `YYYY-MM-DD` date, or `today`.
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    if value.eq_ignore_ascii_case("today") {
        return Ok(chrono::Local::now().date_naive());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{value}' (expected YYYY-MM-DD): {e}"))
}

/// Parse an `HH:MM` time of day.
pub fn parse_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|e| format!("invalid time '{value}' (expected HH:MM): {e}"))
}

/// Parse a reservation status, ignoring case.
pub fn parse_status(value: &str) -> Result<ReservationStatus, String> {
    value.parse().map_err(|_| {
        let known: Vec<&str> = ReservationStatus::ALL.iter().map(|s| s.as_str()).collect();
        format!("unknown status '{value}' (expected one of: {})", known.join(", "))
    })
}

/// Default restaurant for commands that take `--restaurant`.
pub const DEFAULT_RESTAURANT: RestaurantId = 1;

/// Write rows to stdout in the requested format.
pub fn print_rows<T: Tabular>(rows: &[T], format: OutputFormat) -> Result<(), CliError> {
    match format {
        OutputFormat::Table => print_formatted(&TableFormatter, rows),
        OutputFormat::Json => print_formatted(&JsonFormatter, rows),
        OutputFormat::Csv => print_delimited(rows, b','),
        OutputFormat::Tsv => print_delimited(rows, b'\t'),
    }
}

fn print_formatted<F: OutputFormatter, T: Tabular>(formatter: &F, rows: &[T]) -> Result<(), CliError> {
    let out = formatter.format(rows)?;
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{out}")?;
    Ok(())
}

/// Format rows as delimited output (CSV or TSV).
fn print_delimited<T: Tabular>(rows: &[T], delimiter: u8) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let handle = stdout.lock();
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(handle);

    writer.write_record(T::HEADERS)?;
    for row in rows {
        writer.write_record(row.row())?;
    }

    writer.flush()?;
    Ok(())
}
