//! Database initialization operations.
//!
//! This module provides functionality for explicitly initializing the maitre
//! data directory and database, with optional configuration file creation.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::loader::USER_CONFIG_FILE;
use crate::database::{Database, DatabaseConfig, DATABASE_FILE_NAME};
use crate::error::{Error, Result};

/// Options for database initialization.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Data directory to initialize.
    pub data_dir: PathBuf,
    /// Overwrite existing database if it exists.
    pub overwrite: bool,
    /// Create a default configuration file.
    pub create_config: bool,
}

impl InitOptions {
    /// Creates new initialization options.
    #[must_use]
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            overwrite: false,
            create_config: false,
        }
    }

    /// Sets whether to overwrite existing database.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets whether to create default configuration file.
    #[must_use]
    pub fn with_create_config(mut self, create_config: bool) -> Self {
        self.create_config = create_config;
        self
    }
}

/// Result of initialization operation.
#[derive(Debug)]
pub struct InitResult {
    /// Whether the data directory was created.
    pub data_dir_created: bool,
    /// Whether the database was created or recreated.
    pub database_created: bool,
    /// Whether a configuration file was created.
    pub config_created: bool,
    /// Path to the data directory.
    pub data_dir: PathBuf,
}

const DEFAULT_CONFIG_TEMPLATE: &str = r"# Maitre Configuration File

# Table combination settings
# allocation:
#   max_group_size: 4          # 2..=4 tables per party
#   permissive_fallback: true  # combine joinable tables with no configured join

# Reservation length when none is given (minutes)
# default_duration_minutes: 90

# Do not send confirmation emails
# disable_notifications: false

# Maximum lock wait time in seconds (default: 5)
# maximum_lock_wait_seconds: 5

# Output format for listings: table, json, csv, tsv
# output_format: table
";

/// Initializes the maitre data directory and database.
///
/// # Errors
///
/// Returns an error if:
/// - The data directory cannot be created
/// - The database cannot be initialized
/// - The configuration file cannot be written
/// - Overwrite is false and the database already exists
///
/// # Examples
///
/// ```no_run
/// use maitre::operations::init::{InitOptions, init_database};
/// use std::path::{Path, PathBuf};
///
/// let options = InitOptions::new(PathBuf::from("/tmp/maitre-test"))
///     .with_create_config(true);
///
/// let result = init_database(&options).unwrap();
/// println!("Database created: {}", result.database_created);
/// ```
pub fn init_database(options: &InitOptions) -> Result<InitResult> {
    let data_dir = &options.data_dir;
    let data_dir_created = !data_dir.exists();
    if data_dir_created {
        fs::create_dir_all(data_dir)?;
    }

    let db_path = data_dir.join(DATABASE_FILE_NAME);
    if db_path.exists() {
        if !options.overwrite {
            return Err(Error::Validation {
                field: "database".into(),
                message: format!(
                    "Database already exists at {}. Use --overwrite to replace it.",
                    db_path.display()
                ),
            });
        }
        remove_database_files(&db_path)?;
        log::info!("removed existing database at {}", db_path.display());
    }

    Database::open(DatabaseConfig::new(&db_path))?;

    let config_path = data_dir.join(USER_CONFIG_FILE);
    let config_created = options.create_config && !config_path.exists();
    if config_created {
        fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;
    }

    Ok(InitResult {
        data_dir_created,
        database_created: true,
        config_created,
        data_dir: data_dir.clone(),
    })
}

/// Deletes a database file together with its WAL sidecars, so a stale
/// log is never replayed into the new file.
fn remove_database_files(db_path: &Path) -> Result<()> {
    fs::remove_file(db_path)?;
    for suffix in ["-wal", "-shm"] {
        let mut sidecar = db_path.as_os_str().to_os_string();
        sidecar.push(suffix);
        match fs::remove_file(&sidecar) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }
    }
    Ok(())
}
